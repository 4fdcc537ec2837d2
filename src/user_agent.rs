//! Default User-Agent string for lookup and download traffic.

/// Tool identifier used in the default User-Agent.
const TOOL_NAME: &str = "papers-dl";

/// Default User-Agent sent when neither `-A` nor the config file sets one.
#[must_use]
pub fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("{TOOL_NAME}/{version} (paper-fetch-tool)")
}
