// core/src/cohort.rs
//
// Grupperinger beregnes på nytt for hvert scoringspass. BTreeMap gir samme
// iterasjonsrekkefølge uansett radrekkefølge i input.
use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::bucketing::{going_bucket, intensity_bucket_of};
use crate::models::Session;

/// `groupBy(sessions, keyFn)`.
pub fn group_by<'a, K, F>(sessions: &'a [Session], key_fn: F) -> BTreeMap<K, Vec<&'a Session>>
where
    K: Ord,
    F: Fn(&Session) -> K,
{
    let mut groups: BTreeMap<K, Vec<&'a Session>> = BTreeMap::new();
    for s in sessions {
        groups.entry(key_fn(s)).or_default().push(s);
    }
    groups
}

/// Hest-relativ nøkkel: `horse|goingBucket`.
pub fn horse_going_key(s: &Session) -> String {
    format!("{}|{}", s.horse_key(), going_bucket(s.track_condition.as_deref()).as_str())
}

/// Batch-nøkkel: `trainingType|trackCondition` ("NA" når feltet mangler).
pub fn batch_cohort_key(s: &Session) -> String {
    format!(
        "{}|{}",
        s.training_type.as_deref().unwrap_or("NA"),
        s.track_condition.as_deref().unwrap_or("NA")
    )
}

/// `a` er strengt eldre enn `b`. Udaterte økter regnes som eldst.
pub fn is_older(a: &Session, b: &Session) -> bool {
    match (a.date, b.date) {
        (Some(x), Some(y)) => x < y,
        (None, Some(_)) => true,
        _ => false,
    }
}

/// Total, innholdsbasert rekkefølge for like datoer (gjør utvalg uavhengig av radrekkefølge).
fn content_key(s: &Session) -> String {
    serde_json::to_string(s).unwrap_or_default()
}

/// Nyeste først; like datoer sorteres på innhold.
pub fn sort_newest_first(list: &mut Vec<&Session>) {
    list.sort_by_cached_key(|s| (Reverse(s.date), content_key(s)));
}

/// Hele samlingen i kanonisk rekkefølge, sortert én gang per scoringspass.
/// Alle utvalg under filtrerer denne listen og arver dermed rekkefølgen.
pub struct Chronology<'a> {
    ordered: Vec<&'a Session>,
}

impl<'a> Chronology<'a> {
    pub fn new(sessions: &'a [Session]) -> Self {
        let mut ordered: Vec<&'a Session> = sessions.iter().collect();
        sort_newest_first(&mut ordered);
        Self { ordered }
    }

    pub fn ordered(&self) -> &[&'a Session] {
        &self.ordered
    }

    /// Samme hest, strengt eldre økter, nyeste først.
    pub fn history(&self, current: &Session) -> Vec<&'a Session> {
        let horse = current.horse_key();
        self.ordered
            .iter()
            .copied()
            .filter(|s| s.horse_key() == horse && is_older(s, current))
            .collect()
    }

    /// Sammenligningsgrunnlag i hest-relativ modus: samme hest, samme going-bøtte,
    /// samme belastningsbøtte, kun historikk.
    pub fn comparison_pool(&self, current: &Session) -> Vec<&'a Session> {
        let key = horse_going_key(current);
        let demand = intensity_bucket_of(current);
        self.history(current)
            .into_iter()
            .filter(|s| horse_going_key(s) == key && intensity_bucket_of(s) == demand)
            .collect()
    }

    /// Hele hest|going-kohorten (historikk), uten belastningsfilter.
    pub fn going_cohort(&self, current: &Session) -> Vec<&'a Session> {
        let key = horse_going_key(current);
        self.history(current)
            .into_iter()
            .filter(|s| horse_going_key(s) == key)
            .collect()
    }
}

/// Enkeltoppslag uten et ferdig sortert pass.
pub fn history<'a>(sessions: &'a [Session], current: &Session) -> Vec<&'a Session> {
    Chronology::new(sessions).history(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn on(day: u32, horse: &str) -> Session {
        Session {
            horse: Some(horse.to_string()),
            date: NaiveDate::from_ymd_opt(2024, 5, day).and_then(|d| d.and_hms_opt(7, 0, 0)),
            track_condition: Some("Good".into()),
            ..Default::default()
        }
    }

    #[test]
    fn history_is_strictly_older_same_horse() {
        let sessions = vec![on(3, "A"), on(1, "A"), on(2, "A"), on(2, "B"), on(3, "a ")];
        let h = history(&sessions, &sessions[0]);
        assert_eq!(h.len(), 2);
        assert!(h[0].date > h[1].date);
    }

    #[test]
    fn chronology_breaks_date_ties_on_content() {
        let mut a = on(2, "A");
        a.hr5_pct = Some(40.0);
        let mut b = on(2, "A");
        b.hr5_pct = Some(50.0);
        let ab = [a.clone(), b.clone(), on(1, "A")];
        let ba = [b, a, on(1, "A")];
        let c1 = Chronology::new(&ab);
        let c2 = Chronology::new(&ba);
        assert_eq!(c1.ordered(), c2.ordered());
        assert_eq!(c1.ordered()[2].date, on(1, "A").date);
        let cur = on(3, "A");
        assert_eq!(c1.history(&cur), c2.history(&cur));
    }

    #[test]
    fn groups_are_order_independent() {
        let mut sessions = vec![on(1, "A"), on(2, "B"), on(3, "A")];
        let g1: Vec<_> = group_by(&sessions, horse_going_key).into_keys().collect();
        sessions.reverse();
        let g2: Vec<_> = group_by(&sessions, horse_going_key).into_keys().collect();
        assert_eq!(g1, g2);
        assert_eq!(g1, vec!["a|good".to_string(), "b|good".to_string()]);
    }
}
