//! Favourite stops, ordered by how far the rider has to walk.

use std::sync::Arc;

use chrono::TimeDelta;
use geo::Point;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::transit::{StopIndex, StopNumber, StopRecord, TransitError, haversine_distance};

/// A favourite stop with its distance and estimated walk from the rider
#[derive(Clone, Debug, PartialEq)]
pub struct FavouriteEta {
    pub stop: Arc<StopRecord>,
    pub distance_m: f64,
    pub walk_time: TimeDelta,
}

impl FavouriteEta {
    /// Walk time in whole minutes, rounded up
    pub fn walk_minutes(&self) -> i64 {
        let seconds = self.walk_time.num_seconds();
        (seconds + 59) / 60
    }
}

/// The rider's saved stops, in the order they arranged them
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavouriteStops {
    stops: Vec<String>,
}

impl FavouriteStops {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stop numbers, dropping repeats
    pub fn from_numbers<S: AsRef<str>>(numbers: &[S]) -> Self {
        let mut favourites = Self::new();
        for number in numbers {
            favourites.add(number.as_ref());
        }
        favourites
    }

    /// Append a stop; returns `false` if it was already a favourite
    pub fn add(&mut self, number: &str) -> bool {
        if self.contains(number) {
            return false;
        }
        self.stops.push(number.to_string());
        true
    }

    pub fn remove(&mut self, number: &str) -> bool {
        let before = self.stops.len();
        self.stops.retain(|s| s != number);
        self.stops.len() != before
    }

    /// Move the favourite at `from` to position `to`
    pub fn reorder(&mut self, from: usize, to: usize) -> CoreResult<()> {
        if from >= self.stops.len() || to >= self.stops.len() {
            return Err(CoreError::Config(format!(
                "cannot move favourite {from} to {to}: only {} favourites",
                self.stops.len()
            )));
        }
        let number = self.stops.remove(from);
        self.stops.insert(to, number);
        Ok(())
    }

    pub fn contains(&self, number: &str) -> bool {
        self.stops.iter().any(|s| s == number)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.stops.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Every favourite with its walk from `center`, closest first
    ///
    /// A favourite missing from the index is an error rather than being
    /// skipped, since it means the saved list and the dataset disagree.
    pub fn by_walk_time(
        &self,
        index: &StopIndex,
        center: Point,
        walking_speed_mps: f64,
    ) -> CoreResult<Vec<FavouriteEta>> {
        if !(walking_speed_mps.is_finite() && walking_speed_mps > 0.0) {
            return Err(CoreError::Config(format!(
                "walking speed must be positive, got {walking_speed_mps}"
            )));
        }

        let mut etas = self
            .iter()
            .map(|number| -> CoreResult<FavouriteEta> {
                let stop = index
                    .get(number)
                    .ok_or_else(|| TransitError::StopNotFound(StopNumber::new(number)))?;
                let distance_m = haversine_distance(center, stop.location);
                let seconds = (distance_m / walking_speed_mps).round() as i64;
                let walk_time = TimeDelta::try_seconds(seconds).ok_or_else(|| {
                    CoreError::Config(format!("walk of {distance_m}m is out of range"))
                })?;

                Ok(FavouriteEta {
                    stop,
                    distance_m,
                    walk_time,
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        etas.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
        Ok(etas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> StopIndex {
        StopIndex::build(vec![
            StopRecord::new("16385", "CathSq_B", "Cathedral Square", "Colombo St", Point::new(172.6366, -43.5309)),
            StopRecord::new("20763", "BusXchange_A", "Bus Interchange", "Lichfield St", Point::new(172.6367, -43.5347)),
            StopRecord::new("53088", "Riccarton_Mall", "Westfield Riccarton", "Riccarton Rd", Point::new(172.5985, -43.5302)),
        ])
        .unwrap()
    }

    #[test]
    fn test_add_remove_reorder() {
        let mut favourites = FavouriteStops::new();
        assert!(favourites.add("53088"));
        assert!(favourites.add("16385"));
        assert!(!favourites.add("53088"));
        assert_eq!(favourites.len(), 2);

        favourites.reorder(1, 0).unwrap();
        assert_eq!(favourites.iter().collect::<Vec<_>>(), vec!["16385", "53088"]);
        assert!(favourites.reorder(0, 5).is_err());

        assert!(favourites.remove("16385"));
        assert!(!favourites.remove("16385"));
        assert_eq!(favourites.iter().collect::<Vec<_>>(), vec!["53088"]);
    }

    #[test]
    fn test_by_walk_time_sorted() {
        // Saved order puts the furthest stop first
        let favourites = FavouriteStops::from_numbers(&["53088", "20763", "16385"]);
        let here = Point::new(172.6366, -43.5312);

        let etas = favourites.by_walk_time(&index(), here, 1.4).unwrap();
        let order: Vec<&str> = etas.iter().map(|e| e.stop.number.as_str()).collect();
        assert_eq!(order, vec!["16385", "20763", "53088"]);

        for pair in etas.windows(2) {
            assert!(pair[0].walk_time <= pair[1].walk_time);
        }

        // About 3km to Riccarton at 1.4 m/s is a little over half an hour
        let riccarton = &etas[2];
        assert!(riccarton.walk_minutes() > 30 && riccarton.walk_minutes() < 40);
    }

    #[test]
    fn test_unknown_favourite_is_an_error() {
        let favourites = FavouriteStops::from_numbers(&["16385", "00000"]);
        let result = favourites.by_walk_time(&index(), Point::new(172.6366, -43.5309), 1.4);
        assert!(matches!(
            result,
            Err(CoreError::Transit(TransitError::StopNotFound(_)))
        ));
    }

    #[test]
    fn test_serde_as_plain_list() {
        let favourites: FavouriteStops = serde_json::from_str(r#"["20763", "16385"]"#).unwrap();
        assert_eq!(favourites.len(), 2);
        assert_eq!(serde_json::to_string(&favourites).unwrap(), r#"["20763","16385"]"#);
    }
}
