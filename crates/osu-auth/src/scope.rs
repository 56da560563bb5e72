//! OAuth scopes understood by the osu! API

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A permission granted to an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    #[serde(rename = "chat.write")]
    ChatWrite,
    #[serde(rename = "delegate")]
    Delegate,
    #[serde(rename = "forum.write")]
    ForumWrite,
    #[serde(rename = "friends.read")]
    FriendsRead,
    #[serde(rename = "identify")]
    Identify,
    #[serde(rename = "public")]
    Public,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::ChatWrite => "chat.write",
            Scope::Delegate => "delegate",
            Scope::ForumWrite => "forum.write",
            Scope::FriendsRead => "friends.read",
            Scope::Identify => "identify",
            Scope::Public => "public",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat.write" => Ok(Scope::ChatWrite),
            "delegate" => Ok(Scope::Delegate),
            "forum.write" => Ok(Scope::ForumWrite),
            "friends.read" => Ok(Scope::FriendsRead),
            "identify" => Ok(Scope::Identify),
            "public" => Ok(Scope::Public),
            other => Err(format!("unknown scope: {other}")),
        }
    }
}
