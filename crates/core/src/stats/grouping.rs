use std::cmp::Ordering;

use crate::model::{ClimbSession, RouteAttempt};

/// Newest session first; same-day sessions by descending id.
pub fn sort_newest_first(sessions: &mut [ClimbSession]) {
    sessions.sort_by(|a, b| b.date().cmp(&a.date()).then(b.id().cmp(&a.id())));
}

/// Locations the user has climbed at, deduplicated and sorted
/// case-insensitively. Sessions without a location are skipped.
#[must_use]
pub fn distinct_locations(sessions: &[ClimbSession]) -> Vec<String> {
    let mut locations: Vec<String> = sessions
        .iter()
        .filter_map(|s| s.location().map(str::to_string))
        .collect();
    locations.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    locations.dedup();
    locations
}

fn compare_heights(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Routes grouped by wall height, lowest wall first. Numeric heights sort
/// before free-text ones; route order inside a group is preserved.
#[must_use]
pub fn routes_by_wall_height(routes: &[RouteAttempt]) -> Vec<(&str, Vec<&RouteAttempt>)> {
    let mut groups: Vec<(&str, Vec<&RouteAttempt>)> = Vec::new();
    for route in routes {
        let height = route.wall_height.as_str();
        match groups.iter_mut().find(|(h, _)| *h == height) {
            Some((_, members)) => members.push(route),
            None => groups.push((height, vec![route])),
        }
    }
    groups.sort_by(|(a, _), (b, _)| compare_heights(a, b));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SessionDraft, SessionId, UserId};
    use crate::time::days_ago;

    fn session(id: u64, days: i64, location: &str) -> ClimbSession {
        let mut draft = SessionDraft::new(days_ago(days));
        draft.location = location.into();
        ClimbSession::new(SessionId::new(id), UserId::random(), draft.validate().unwrap())
    }

    #[test]
    fn newest_first_then_id() {
        let mut sessions = vec![session(1, 3, ""), session(2, 0, ""), session(3, 0, "")];
        sort_newest_first(&mut sessions);
        let ids: Vec<_> = sessions.iter().map(|s| s.id().value()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn locations_are_unique_and_sorted() {
        let sessions = vec![
            session(1, 0, "Boulders Aarhus"),
            session(2, 1, "  "),
            session(3, 2, "absolut klatring"),
            session(4, 3, "Boulders Aarhus"),
        ];
        assert_eq!(
            distinct_locations(&sessions),
            vec!["absolut klatring".to_string(), "Boulders Aarhus".to_string()]
        );
    }

    #[test]
    fn groups_by_height_numeric_first() {
        let routes = vec![
            RouteAttempt::colored("Gul").with_wall_height("5"),
            RouteAttempt::colored("Rød").with_wall_height("4.5"),
            RouteAttempt::colored("Sort").with_wall_height("cave"),
            RouteAttempt::colored("Blå"),
        ];
        let groups = routes_by_wall_height(&routes);
        let keys: Vec<_> = groups.iter().map(|(h, _)| *h).collect();
        assert_eq!(keys, vec!["4.5", "5", "cave"]);
        assert_eq!(groups[1].1.len(), 2);
    }
}
