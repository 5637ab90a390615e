use serde::Deserialize;

/// Role of a user, stored as a small integer in `users.level`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "LevelRepr")]
pub enum UserLevel{
    #[default]
    Customer,
    Vendor,
    Admin
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("{0} is not a valid user level, expected 0 (customer), 1 (vendor) or 2 (admin)")]
pub struct InvalidUserLevel(pub String);

impl UserLevel {
    pub fn as_i16(self) -> i16{
        match self {
            UserLevel::Customer => 0,
            UserLevel::Vendor => 1,
            UserLevel::Admin => 2
        }
    }
}

impl TryFrom<i16> for UserLevel {
    type Error = InvalidUserLevel;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(UserLevel::Customer),
            1 => Ok(UserLevel::Vendor),
            2 => Ok(UserLevel::Admin),
            other => Err(InvalidUserLevel(other.to_string()))
        }
    }
}

impl std::fmt::Display for UserLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UserLevel::Customer => "customer",
            UserLevel::Vendor => "vendor",
            UserLevel::Admin => "admin"
        };
        f.write_str(name)
    }
}

// Clients send the level either as a number or as a numeric string
#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr{
    Number(i64),
    Text(String)
}

impl TryFrom<LevelRepr> for UserLevel {
    type Error = InvalidUserLevel;

    fn try_from(value: LevelRepr) -> Result<Self, Self::Error> {
        let number = match value {
            LevelRepr::Number(n) => n,
            LevelRepr::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| InvalidUserLevel(text.clone()))?
        };

        i16::try_from(number)
            .map_err(|_| InvalidUserLevel(number.to_string()))
            .and_then(UserLevel::try_from)
    }
}
