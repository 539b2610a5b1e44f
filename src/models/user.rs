/// A local account linked to a Slack identity.
///
/// Name and token are the values seen on first contact and are never
/// refreshed from later payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub slack_user_id: String,
    pub slack_user_name: String,
    pub slack_user_token: String,
    pub created: String,
    pub last_modified: String,
}

impl User {
    /// The id to stamp on tasks this user creates, if the row has one.
    #[must_use]
    pub const fn creator_id(&self) -> Option<i32> {
        if self.id > 0 { Some(self.id) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i32) -> User {
        User {
            id,
            slack_user_id: "U1".to_string(),
            slack_user_name: "steve".to_string(),
            slack_user_token: "tok".to_string(),
            created: "2026-10-01T12:00:00Z".to_string(),
            last_modified: "2026-10-01T12:00:00Z".to_string(),
        }
    }

    #[test]
    fn stored_user_owns_tasks() {
        assert_eq!(user(7).creator_id(), Some(7));
    }

    #[test]
    fn unassigned_id_has_no_creator() {
        assert_eq!(user(0).creator_id(), None);
        assert_eq!(user(-1).creator_id(), None);
    }
}
