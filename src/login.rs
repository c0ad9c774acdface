//! Login form state and validation.
//!
//! The form gates submission client-side: a username of at least three
//! characters and a non-empty password. Validation failures surface as
//! auto-dismissing notices; a passing form is posted to the backend as a
//! standard form POST and the outcome reported back over a channel.

use tokio::sync::mpsc;
use tracing::warn;

/// Minimum username length accepted by the client-side gate.
const MIN_USERNAME_LEN: usize = 3;

/// Which input currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

/// Outcome of a submitted login, reported by the background POST task.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Accepted,
    Rejected(String),
}

/// State of the login form.
#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub show_password: bool,
    pub submitting: bool,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the form. Returns the message to surface when the gate
    /// blocks submission.
    pub fn validate(&self) -> Result<(), &'static str> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err("Please enter your username");
        }
        if self.password.is_empty() {
            return Err("Please enter your password");
        }
        if username.len() < MIN_USERNAME_LEN {
            return Err("Username must be at least 3 characters long");
        }
        Ok(())
    }

    /// Move focus to the other field.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    /// Toggle password visibility.
    pub fn toggle_show_password(&mut self) {
        self.show_password = !self.show_password;
    }

    /// Type a character into the focused field.
    pub fn push_char(&mut self, c: char) {
        match self.focus {
            LoginField::Username => self.username.push(c),
            LoginField::Password => self.password.push(c),
        }
    }

    /// Delete the last character of the focused field.
    pub fn pop_char(&mut self) {
        match self.focus {
            LoginField::Username => {
                self.username.pop();
            }
            LoginField::Password => {
                self.password.pop();
            }
        }
    }

    /// Clear both fields and reset visibility (the Escape action).
    pub fn clear(&mut self) {
        self.username.clear();
        self.password.clear();
        self.show_password = false;
        self.focus = LoginField::Username;
    }

    /// The password as displayed: masked unless visibility is toggled on.
    pub fn password_display(&self) -> String {
        if self.show_password {
            self.password.clone()
        } else {
            "•".repeat(self.password.chars().count())
        }
    }
}

/// Post the credentials as a standard form POST.
///
/// Runs in the background; the outcome arrives on the returned channel so
/// the event loop never blocks on the network.
pub fn submit(login_url: &str, username: &str, password: &str) -> mpsc::Receiver<LoginOutcome> {
    let (tx, rx) = mpsc::channel(1);
    let url = login_url.to_string();
    let form = [
        ("username".to_string(), username.trim().to_string()),
        ("password".to_string(), password.to_string()),
    ];

    tokio::spawn(async move {
        let client = reqwest::Client::new();
        let outcome = match client.post(&url).form(&form).send().await {
            Ok(response) if response.status().is_success() => LoginOutcome::Accepted,
            Ok(response) => {
                warn!(status = %response.status(), "login rejected");
                LoginOutcome::Rejected(format!("Login failed ({})", response.status()))
            }
            Err(e) => {
                warn!("login request failed: {}", e);
                LoginOutcome::Rejected(format!("Login failed: {}", e))
            }
        };
        let _ = tx.send(outcome).await;
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_username_blocks_submission() {
        let form = LoginForm {
            password: "secret".to_string(),
            ..LoginForm::default()
        };
        assert_eq!(form.validate(), Err("Please enter your username"));
    }

    #[test]
    fn test_whitespace_username_counts_as_empty() {
        let form = LoginForm {
            username: "   ".to_string(),
            password: "secret".to_string(),
            ..LoginForm::default()
        };
        assert_eq!(form.validate(), Err("Please enter your username"));
    }

    #[test]
    fn test_empty_password_blocks_submission() {
        let form = LoginForm {
            username: "teknisi".to_string(),
            ..LoginForm::default()
        };
        assert_eq!(form.validate(), Err("Please enter your password"));
    }

    #[test]
    fn test_short_username_blocks_submission() {
        let form = LoginForm {
            username: "ab".to_string(),
            password: "secret".to_string(),
            ..LoginForm::default()
        };
        assert_eq!(
            form.validate(),
            Err("Username must be at least 3 characters long")
        );
    }

    #[test]
    fn test_valid_form_passes() {
        let form = LoginForm {
            username: "apt".to_string(),
            password: "x".to_string(),
            ..LoginForm::default()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_password_masking() {
        let mut form = LoginForm::new();
        form.focus = LoginField::Password;
        for c in "abc".chars() {
            form.push_char(c);
        }
        assert_eq!(form.password_display(), "•••");
        form.toggle_show_password();
        assert_eq!(form.password_display(), "abc");
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut form = LoginForm::new();
        form.username = "user".to_string();
        form.password = "pass".to_string();
        form.show_password = true;
        form.focus = LoginField::Password;
        form.clear();
        assert!(form.username.is_empty());
        assert!(form.password.is_empty());
        assert!(!form.show_password);
        assert_eq!(form.focus, LoginField::Username);
    }

    #[tokio::test]
    async fn test_submit_reports_rejection() {
        let mut server = mockito::Server::new_async().await;
        let _login = server
            .mock("POST", "/login")
            .with_status(401)
            .create_async()
            .await;

        let mut rx = submit(&format!("{}/login", server.url()), "teknisi", "wrong");
        let outcome = rx.recv().await.expect("outcome delivered");
        assert!(matches!(outcome, LoginOutcome::Rejected(_)));
    }

    #[tokio::test]
    async fn test_submit_reports_acceptance() {
        let mut server = mockito::Server::new_async().await;
        let _login = server
            .mock("POST", "/login")
            .with_status(200)
            .create_async()
            .await;

        let mut rx = submit(&format!("{}/login", server.url()), "teknisi", "right");
        let outcome = rx.recv().await.expect("outcome delivered");
        assert_eq!(outcome, LoginOutcome::Accepted);
    }
}
