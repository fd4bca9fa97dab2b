use serde::{Deserialize, Serialize};

// -- Token claims --

/// Claims carried by the session token. `exp` is a unix timestamp in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub exp: usize,
}

// -- Auth forms --

// Missing fields deserialize as empty so the handlers can re-render the
// form instead of rejecting the request outright.

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterForm {
    /// Returns the message to show inline when the form can't be submitted.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err("Username and password are required");
        }
        if self.username.len() > 255 {
            return Err("Username is too long");
        }
        Ok(())
    }
}

// -- Diaries --

#[derive(Debug, Deserialize)]
pub struct DiaryForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl DiaryForm {
    /// Empty content is stored as NULL.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, password: &str) -> RegisterForm {
        RegisterForm {
            username: username.into(),
            password: password.into(),
        }
    }

    #[test]
    fn register_form_requires_both_fields() {
        assert!(register("bob", "x").validate().is_ok());
        assert!(register("", "x").validate().is_err());
        assert!(register("   ", "x").validate().is_err());
        assert!(register("bob", "").validate().is_err());
        assert!(register(&"a".repeat(256), "x").validate().is_err());
    }

    #[test]
    fn empty_content_is_none() {
        let form = DiaryForm { title: "t".into(), content: Some(String::new()) };
        assert_eq!(form.content(), None);

        let form = DiaryForm { title: "t".into(), content: Some("c".into()) };
        assert_eq!(form.content(), Some("c"));
    }
}
