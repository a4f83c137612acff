use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    User,
    Assistant,
}

impl Origin {
    pub fn as_str(self) -> &'static str {
        match self {
            Origin::User => "user",
            Origin::Assistant => "assistant",
        }
    }
}

/// A single chat entry. Messages are never edited once created.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    id: Uuid,
    origin: Origin,
    content: String,
    created_at: OffsetDateTime,
}

impl Message {
    pub fn new(origin: Origin, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            content: content.into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Origin::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Origin::Assistant, content)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}
