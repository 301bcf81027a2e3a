use anyhow::{Context as _, Result};

use crate::context::Context;

/// Resolved account credentials for one invocation
pub struct Credentials {
    pub account: String,
    pub api_key: String,
}

/// Resolve account name and API key from flags/environment, prompting for
/// whatever is missing. The API key prompt is masked.
pub fn resolve_credentials(
    ctx: &Context,
    account: Option<&str>,
    api_key: Option<&str>,
) -> Result<Credentials> {
    let account = match account {
        Some(a) if !a.trim().is_empty() => a.to_string(),
        _ => ctx
            .input
            .text("Twingate account name:", None)
            .context("Failed to read account name")?,
    };

    let api_key = match api_key {
        Some(k) if !k.trim().is_empty() => k.to_string(),
        _ => ctx
            .input
            .secret("Twingate API key:")
            .context("Failed to read API key")?,
    };

    Ok(Credentials { account, api_key })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::user_input::MockResponse;
    use crate::traits::{MockFileSystem, MockOutput, MockUserInput};
    use std::sync::Arc;

    #[test]
    fn test_flags_win_over_prompt() {
        let ctx = Context::test();
        let creds = resolve_credentials(&ctx, Some("acme"), Some("key")).unwrap();

        assert_eq!(creds.account, "acme");
        assert_eq!(creds.api_key, "key");
    }

    #[test]
    fn test_missing_values_are_prompted() {
        let input = MockUserInput::with_responses(vec![
            MockResponse::Text("acme".to_string()),
            MockResponse::Secret("prompted-key".to_string()),
        ]);
        let ctx = Context::test_with(
            Arc::new(MockFileSystem::new()),
            Arc::new(input),
            Arc::new(MockOutput::new()),
        );

        let creds = resolve_credentials(&ctx, None, Some("  ")).unwrap();

        assert_eq!(creds.account, "acme");
        assert_eq!(creds.api_key, "prompted-key");
    }
}
