use std::fmt::Debug;

const MIN_LENGTH: usize = 3;
const MAX_LENGTH: usize = 32;

#[derive(Debug, Clone)]
pub struct Username(String);

impl Username{
    pub fn parse(username: String) -> Result<Username, String>{
        let trimmed = username.trim();
        let length = trimmed.chars().count();

        if length < MIN_LENGTH || length > MAX_LENGTH {
            return Err(format!(
                "{} is not a valid username, it must be {} to {} characters long",
                username, MIN_LENGTH, MAX_LENGTH
            ))
        }

        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.');
        if !trimmed.chars().all(allowed) {
            return Err(format!(
                "{} is not a valid username, only letters, digits, '_', '-' and '.' are allowed",
                username
            ))
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn inner(&self) -> String {
        self.0.clone()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}
