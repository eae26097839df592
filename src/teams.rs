//! Team registry - static lookup table for the four shift teams

/// A shift team
pub struct Team {
    pub id: &'static str,
    pub label: &'static str,
    pub full_name: &'static str,
}

/// The four shift teams covering the week
pub const TEAMS: [Team; 4] = [
    Team {
        id: "A",
        label: "Team A - Front Half Days",
        full_name: "Front Half Days (Sun-Wed 6a-6p)",
    },
    Team {
        id: "B",
        label: "Team B - Front Half Nights",
        full_name: "Front Half Nights (Sun-Wed 6p-6a)",
    },
    Team {
        id: "C",
        label: "Team C - Back Half Days",
        full_name: "Back Half Days (Wed-Sat 6a-6p)",
    },
    Team {
        id: "D",
        label: "Team D - Back Half Nights",
        full_name: "Back Half Nights (Wed-Sat 6p-6a)",
    },
];

/// Display label for a team id, falling back to `Team {id}` for unknown ids
pub fn team_label(id: &str) -> String {
    TEAMS
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.label.to_string())
        .unwrap_or_else(|| format!("Team {}", id))
}

/// Full schedule name for a team id
pub fn team_full_name(id: &str) -> String {
    TEAMS
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.full_name.to_string())
        .unwrap_or_else(|| format!("Team {}", id))
}
