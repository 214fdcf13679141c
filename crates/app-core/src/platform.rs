//! Host platform hooks: user-visible notices and the social login provider

use serde::{Deserialize, Serialize};

/// Alerts shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// The stored password credential no longer works
    LoggedOut,
    /// The stored social-provider token no longer works
    SocialLoginExpired,
}

impl Notice {
    /// Alert title
    pub fn title(self) -> &'static str {
        match self {
            Notice::LoggedOut => "You were logged out",
            Notice::SocialLoginExpired => "Facebook login expired",
        }
    }

    /// Alert body
    pub fn message(self) -> &'static str {
        "Please log in again"
    }
}

/// Displays notices to the user
pub trait Notifier: Send + Sync {
    /// Show a notice; fire-and-forget
    fn notify(&self, notice: Notice);
}

/// Third-party social login SDK
pub trait SocialLoginProvider: Send + Sync {
    /// Drop the provider's local session; fire-and-forget
    fn logout(&self);
}

/// Social provider for hosts without social login
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSocialLogin;

impl SocialLoginProvider for NoSocialLogin {
    fn logout(&self) {
        tracing::debug!("no social login provider configured");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_text() {
        assert_eq!(Notice::LoggedOut.title(), "You were logged out");
        assert_eq!(Notice::SocialLoginExpired.title(), "Facebook login expired");
        assert_eq!(Notice::LoggedOut.message(), "Please log in again");
        assert_eq!(Notice::SocialLoginExpired.message(), "Please log in again");
    }
}
