//! Code-backed block state translators
//!
//! Mapping data drives identifier renames; the state shapes that differ
//! structurally between editions (numeric direction encodings, bit flags,
//! off-by-one counters) are translated by the named units registered here.
//! Block variants reference translators by name; an unknown name is a
//! mapping-load error.
//!
//! Translators convert between edition-side states and the intermediate
//! (Java-flavored) states. Keys a translator does not claim pass through
//! unchanged; unrecognized values fall back to the first canonical value
//! with a warning rather than failing the whole conversion.

use tracing::warn;

use crate::model::{StateValue, States};

pub struct Translator {
    pub name: &'static str,
    /// Edition states to intermediate states.
    pub read: fn(&States) -> States,
    /// Intermediate states to edition states.
    pub write: fn(&States) -> States,
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator").field("name", &self.name).finish()
    }
}

static TRANSLATORS: &[Translator] = &[
    Translator {
        name: "pillar_axis",
        read: pillar_axis_read,
        write: pillar_axis_write,
    },
    Translator {
        name: "stairs",
        read: stairs_read,
        write: stairs_write,
    },
    Translator {
        name: "snow_layers",
        read: snow_read,
        write: snow_write,
    },
    Translator {
        name: "cardinal_direction",
        read: cardinal_read,
        write: cardinal_write,
    },
    Translator {
        name: "facing_direction",
        read: facing6_read,
        write: facing6_write,
    },
];

/// Look up a translator by name.
pub fn get(name: &str) -> Option<&'static Translator> {
    TRANSLATORS.iter().find(|t| t.name == name)
}

fn str_state<'a>(states: &'a States, key: &str) -> Option<&'a str> {
    match states.get(key) {
        Some(StateValue::String(s)) => Some(s.as_str()),
        _ => None,
    }
}

fn int_state(states: &States, key: &str) -> Option<i32> {
    match states.get(key) {
        Some(StateValue::Int(i)) => Some(*i),
        Some(StateValue::Bool(b)) => Some(*b as i32),
        _ => None,
    }
}

fn bool_state(states: &States, key: &str) -> Option<bool> {
    match states.get(key) {
        Some(StateValue::Bool(b)) => Some(*b),
        Some(StateValue::Int(i)) => Some(*i != 0),
        _ => None,
    }
}

/// Copy every state except the listed keys.
fn passthrough(states: &States, claimed: &[&str]) -> States {
    states
        .iter()
        .filter(|(k, _)| !claimed.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

// axis <-> pillar_axis: same values, Bedrock renames the key.

fn pillar_axis_read(states: &States) -> States {
    let mut out = passthrough(states, &["pillar_axis"]);
    let axis = str_state(states, "pillar_axis").unwrap_or("y");
    out.insert("axis".into(), axis.into());
    out
}

fn pillar_axis_write(states: &States) -> States {
    let mut out = passthrough(states, &["axis"]);
    let axis = str_state(states, "axis").unwrap_or("y");
    out.insert("pillar_axis".into(), axis.into());
    out
}

// Stairs: Java facing/half, Bedrock weirdo_direction/upside_down_bit.
// weirdo_direction: 0 east, 1 west, 2 south, 3 north.

const WEIRDO_FACINGS: [&str; 4] = ["east", "west", "south", "north"];

fn stairs_read(states: &States) -> States {
    let mut out = passthrough(states, &["weirdo_direction", "upside_down_bit"]);
    let direction = int_state(states, "weirdo_direction").unwrap_or(0);
    let facing = WEIRDO_FACINGS
        .get(direction as usize)
        .copied()
        .unwrap_or_else(|| {
            warn!(direction, "Unrecognized weirdo_direction, defaulting to east");
            "east"
        });
    out.insert("facing".into(), facing.into());
    let half = if bool_state(states, "upside_down_bit").unwrap_or(false) {
        "top"
    } else {
        "bottom"
    };
    out.insert("half".into(), half.into());
    out
}

fn stairs_write(states: &States) -> States {
    let mut out = passthrough(states, &["facing", "half"]);
    let facing = str_state(states, "facing").unwrap_or("east");
    let direction = WEIRDO_FACINGS
        .iter()
        .position(|f| *f == facing)
        .unwrap_or_else(|| {
            warn!(facing, "Unrecognized stair facing, defaulting to east");
            0
        });
    out.insert("weirdo_direction".into(), StateValue::Int(direction as i32));
    out.insert(
        "upside_down_bit".into(),
        StateValue::Bool(str_state(states, "half") == Some("top")),
    );
    out
}

// Snow: Java layers 1-8, Bedrock height 0-7.

fn snow_read(states: &States) -> States {
    let mut out = passthrough(states, &["height"]);
    let height = int_state(states, "height").unwrap_or(0).clamp(0, 7);
    out.insert("layers".into(), StateValue::Int(height + 1));
    out
}

fn snow_write(states: &States) -> States {
    let mut out = passthrough(states, &["layers"]);
    let layers = int_state(states, "layers").unwrap_or(1).clamp(1, 8);
    out.insert("height".into(), StateValue::Int(layers - 1));
    out
}

// Horizontal facing: Bedrock direction 0 south, 1 west, 2 north, 3 east.

const CARDINAL_FACINGS: [&str; 4] = ["south", "west", "north", "east"];

fn cardinal_read(states: &States) -> States {
    let mut out = passthrough(states, &["direction"]);
    let direction = int_state(states, "direction").unwrap_or(0);
    let facing = CARDINAL_FACINGS
        .get(direction as usize)
        .copied()
        .unwrap_or_else(|| {
            warn!(direction, "Unrecognized direction, defaulting to south");
            "south"
        });
    out.insert("facing".into(), facing.into());
    out
}

fn cardinal_write(states: &States) -> States {
    let mut out = passthrough(states, &["facing"]);
    let facing = str_state(states, "facing").unwrap_or("south");
    let direction = CARDINAL_FACINGS
        .iter()
        .position(|f| *f == facing)
        .unwrap_or_else(|| {
            warn!(facing, "Unrecognized facing, defaulting to south");
            0
        });
    out.insert("direction".into(), StateValue::Int(direction as i32));
    out
}

// Full six-way facing: Bedrock facing_direction 0 down, 1 up, 2 north,
// 3 south, 4 west, 5 east.

const SIX_WAY_FACINGS: [&str; 6] = ["down", "up", "north", "south", "west", "east"];

fn facing6_read(states: &States) -> States {
    let mut out = passthrough(states, &["facing_direction"]);
    let direction = int_state(states, "facing_direction").unwrap_or(0);
    let facing = SIX_WAY_FACINGS
        .get(direction as usize)
        .copied()
        .unwrap_or_else(|| {
            warn!(direction, "Unrecognized facing_direction, defaulting to down");
            "down"
        });
    out.insert("facing".into(), facing.into());
    out
}

fn facing6_write(states: &States) -> States {
    let mut out = passthrough(states, &["facing"]);
    let facing = str_state(states, "facing").unwrap_or("down");
    let direction = SIX_WAY_FACINGS
        .iter()
        .position(|f| *f == facing)
        .unwrap_or_else(|| {
            warn!(facing, "Unrecognized facing, defaulting to down");
            0
        });
    out.insert("facing_direction".into(), StateValue::Int(direction as i32));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states(pairs: &[(&str, StateValue)]) -> States {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_registry_lookup() {
        assert!(get("stairs").is_some());
        assert!(get("snow_layers").is_some());
        assert!(get("missing_translator").is_none());
    }

    #[test]
    fn test_pillar_axis_roundtrip() {
        let java = states(&[("axis", "z".into())]);
        let bedrock = pillar_axis_write(&java);
        assert_eq!(bedrock.get("pillar_axis"), Some(&"z".into()));
        assert_eq!(pillar_axis_read(&bedrock), java);
    }

    #[test]
    fn test_stairs_both_directions() {
        let java = states(&[("facing", "north".into()), ("half", "top".into())]);
        let bedrock = stairs_write(&java);
        assert_eq!(bedrock.get("weirdo_direction"), Some(&StateValue::Int(3)));
        assert_eq!(
            bedrock.get("upside_down_bit"),
            Some(&StateValue::Bool(true))
        );
        assert_eq!(stairs_read(&bedrock), java);
    }

    #[test]
    fn test_stairs_bad_direction_falls_back() {
        let bedrock = states(&[("weirdo_direction", StateValue::Int(9))]);
        let java = stairs_read(&bedrock);
        assert_eq!(java.get("facing"), Some(&"east".into()));
        assert_eq!(java.get("half"), Some(&"bottom".into()));
    }

    #[test]
    fn test_snow_layers_offset() {
        let java = states(&[("layers", StateValue::Int(8))]);
        let bedrock = snow_write(&java);
        assert_eq!(bedrock.get("height"), Some(&StateValue::Int(7)));
        assert_eq!(snow_read(&bedrock), java);
    }

    #[test]
    fn test_cardinal_roundtrip_all_facings() {
        for facing in ["north", "south", "east", "west"] {
            let java = states(&[("facing", facing.into())]);
            assert_eq!(cardinal_read(&cardinal_write(&java)), java);
        }
    }

    #[test]
    fn test_facing6_roundtrip_all_facings() {
        for facing in SIX_WAY_FACINGS {
            let java = states(&[("facing", facing.into())]);
            assert_eq!(facing6_read(&facing6_write(&java)), java);
        }
    }

    #[test]
    fn test_unclaimed_states_pass_through() {
        let java = states(&[
            ("facing", "west".into()),
            ("waterlogged", StateValue::Bool(true)),
        ]);
        let bedrock = cardinal_write(&java);
        assert_eq!(bedrock.get("waterlogged"), Some(&StateValue::Bool(true)));
    }
}
