//! Team roster and assignee display helpers.

use serde::{Deserialize, Serialize};

use crate::fields::Role;

/// A person tasks can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: String,
}

fn member(id: &str, name: &str, email: &str, role: Role, department: &str) -> TeamMember {
    TeamMember {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        role,
        department: department.into(),
    }
}

/// The demo roster.
pub fn demo_team() -> Vec<TeamMember> {
    vec![
        member("user1", "Arjun Sharma", "arjun@example.com", Role::Admin, "Engineering"),
        member("user2", "Priya Patel", "priya@example.com", Role::Member, "Design"),
        member("user3", "Raj Malhotra", "raj@example.com", Role::Member, "Engineering"),
        member("user4", "Meera Verma", "meera@example.com", Role::Member, "Marketing"),
    ]
}

pub fn find_member<'a>(team: &'a [TeamMember], id: &str) -> Option<&'a TeamMember> {
    team.iter().find(|m| m.id == id)
}

/// Uppercased first letter, the avatar fallback.
pub fn initials(s: &str) -> String {
    s.chars().next().map(|c| c.to_uppercase().collect()).unwrap_or_default()
}

/// How an assignee is shown. Ids that match nobody fall back to their
/// initial rather than failing; an empty id counts as unassigned.
pub fn assignee_label(assignee_id: Option<&str>, team: &[TeamMember]) -> String {
    match assignee_id.filter(|id| !id.is_empty()) {
        None => "Unassigned".to_string(),
        Some(id) => match find_member(team, id) {
            Some(m) => m.name.clone(),
            None => initials(id),
        },
    }
}
