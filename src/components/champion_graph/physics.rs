//! Per-view physics profiles for the force simulation.
//!
//! Each relation view reads better under different solver tuning: the
//! main relation web is hub-and-spoke and wants a strong central pull,
//! while the item mesh is dense and wants looser springs with more
//! breathing room. Profiles are a declarative lookup keyed by the active
//! filter; anything unrecognized (including "all") gets the default.

use force_graph::SimulationParameters;

use super::filter::RelationFilter;

/// Solver tuning for the given view. Lookup never fails.
pub fn profile_for(filter: &RelationFilter) -> SimulationParameters {
	match filter {
		RelationFilter::Only(t) if t == "relMain" => main_relations(),
		RelationFilter::Only(t) if t == "relItems" => item_relations(),
		_ => default_profile(),
	}
}

/// Hub-and-spoke main relations: strong repulsion, tight springs.
fn main_relations() -> SimulationParameters {
	SimulationParameters {
		force_charge: 280.0,
		force_spring: 0.08,
		force_max: 120.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	}
}

/// Dense item mesh: weaker repulsion, loose springs, heavier damping.
fn item_relations() -> SimulationParameters {
	SimulationParameters {
		force_charge: 120.0,
		force_spring: 0.03,
		force_max: 80.0,
		node_speed: 2000.0,
		damping_factor: 0.95,
	}
}

fn default_profile() -> SimulationParameters {
	SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn known_views_get_their_own_tuning() {
		let main = profile_for(&RelationFilter::Only("relMain".to_string()));
		let items = profile_for(&RelationFilter::Only("relItems".to_string()));
		assert_eq!(main.force_charge, 280.0);
		assert_eq!(items.force_charge, 120.0);
	}

	#[test]
	fn unknown_views_fall_back_to_default() {
		let unknown = profile_for(&RelationFilter::Only("relSomethingElse".to_string()));
		let all = profile_for(&RelationFilter::All);
		assert_eq!(unknown.force_charge, 150.0);
		assert_eq!(all.force_charge, 150.0);
		assert_eq!(all.damping_factor, 0.9);
	}
}
