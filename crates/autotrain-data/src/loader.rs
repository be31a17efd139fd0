//! Reads scenario directories: format detection (RON/JSON/TOML), file
//! discovery, deserialization, and name resolution into a live network.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use autotrain_core::capacity::CapacityModel;
use autotrain_core::catalog::{CatalogError, ItemTable};
use autotrain_core::config::ControllerConfig;
use autotrain_core::id::{StationId, UnitId};
use autotrain_core::memory::MemoryNetwork;
use autotrain_core::network::TransportUnitActuator;
use autotrain_core::route::RouteSpec;
use autotrain_core::signal::{SignalCount, WireColor};
use tracing::debug;

use crate::schema::{NetworkData, SignalData};

/// Base name of the optional controller config file.
pub const CONFIG_FILE: &str = "controller";
/// Base name of the required network file.
pub const NETWORK_FILE: &str = "network";

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading a scenario.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A station name referenced by a unit could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// The item table was rejected.
    #[error("invalid item table in {file}: {source}")]
    Catalog {
        file: PathBuf,
        source: CatalogError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Files
// ===========================================================================

const EXTENSIONS: [&str; 3] = ["ron", "toml", "json"];

/// The single `{base_name}.{ron,toml,json}` in `dir`, if any.
fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;
    for ext in EXTENSIONS {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if !candidate.exists() {
            continue;
        }
        if let Some(a) = found {
            return Err(DataLoadError::ConflictingFormats { a, b: candidate });
        }
        found = Some(candidate);
    }
    Ok(found)
}

/// Read a data file, picking the parser from its extension.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let parse_error = |detail: String| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    };
    let ext = path.extension().and_then(|e| e.to_str());
    if !ext.is_some_and(|e| EXTENSIONS.contains(&e)) {
        return Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    match ext {
        Some("ron") => ron::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Some("toml") => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
        _ => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
    }
}

/// Register `name -> id`, rejecting a second station or unit of that name.
fn insert_unique<K>(
    ids: &mut HashMap<String, K>,
    name: &str,
    id: K,
    file: &Path,
) -> Result<(), DataLoadError> {
    if ids.insert(name.to_string(), id).is_some() {
        return Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Resolve a station referenced by a unit.
fn station_ref(
    station_ids: &HashMap<String, StationId>,
    name: &str,
    file: &Path,
) -> Result<StationId, DataLoadError> {
    station_ids
        .get(name)
        .copied()
        .ok_or_else(|| DataLoadError::UnresolvedRef {
            file: file.to_path_buf(),
            name: name.to_string(),
            expected_kind: "station",
        })
}

// ===========================================================================
// Scenario loading
// ===========================================================================

/// A loaded scenario: config, a populated network, and name lookups.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub config: ControllerConfig,
    pub network: MemoryNetwork,
    pub station_ids: HashMap<String, StationId>,
    pub unit_ids: HashMap<String, UnitId>,
}

impl Scenario {
    pub fn station(&self, name: &str) -> Option<StationId> {
        self.station_ids.get(name).copied()
    }

    pub fn unit(&self, name: &str) -> Option<UnitId> {
        self.unit_ids.get(name).copied()
    }
}

/// Load the controller config from `dir`, or the defaults if there is no
/// `controller.{ron,toml,json}`.
pub fn load_config(dir: &Path) -> Result<ControllerConfig, DataLoadError> {
    match find_data_file(dir, CONFIG_FILE)? {
        Some(path) => deserialize_file(&path),
        None => Ok(ControllerConfig::default()),
    }
}

/// Load a scenario directory: optional `controller.*` plus required
/// `network.*`.
pub fn load_scenario(dir: &Path) -> Result<Scenario, DataLoadError> {
    let config = load_config(dir)?;
    let path =
        find_data_file(dir, NETWORK_FILE)?.ok_or_else(|| DataLoadError::MissingRequired {
            file: NETWORK_FILE.to_string(),
            dir: dir.to_path_buf(),
        })?;
    let data: NetworkData = deserialize_file(&path)?;
    let scenario = build_scenario(&data, config, &path)?;
    debug!(
        dir = %dir.display(),
        stations = scenario.station_ids.len(),
        units = scenario.unit_ids.len(),
        "scenario loaded"
    );
    Ok(scenario)
}

/// Resolve parsed network data into a live in-memory network. `file` is
/// only used in error messages.
pub fn build_scenario(
    data: &NetworkData,
    config: ControllerConfig,
    file: &Path,
) -> Result<Scenario, DataLoadError> {
    let mut items = ItemTable::builder();
    for item in &data.items {
        items = if item.stackable {
            items.item(&item.name, item.stack_size)
        } else {
            items.unstackable(&item.name)
        };
    }
    let catalog = items.build().map_err(|source| DataLoadError::Catalog {
        file: file.to_path_buf(),
        source,
    })?;

    let mut network =
        MemoryNetwork::new(catalog).with_capacity_model(CapacityModel::from_config(&config));

    let mut station_ids = HashMap::new();
    for station in &data.stations {
        let id = network.add_station(&station.name);
        insert_unique(&mut station_ids, &station.name, id, file)?;

        let mut red: Vec<SignalCount> = station
            .role
            .marker(&config.markers)
            .map(|marker| SignalCount::new(marker, 1))
            .into_iter()
            .collect();
        red.extend(station.red.iter().map(SignalData::to_count));
        network.set_wire(id, WireColor::Red, red);
        network.set_wire(
            id,
            WireColor::Green,
            station.green.iter().map(SignalData::to_count).collect(),
        );
        for wire in &station.detached {
            network.detach_wire(id, *wire);
        }
    }

    let mut unit_ids = HashMap::new();
    for unit in &data.units {
        let at = unit
            .at
            .as_deref()
            .map(|name| station_ref(&station_ids, name, file))
            .transpose()?;
        let id = network.add_unit(&unit.name, unit.kind, at);
        insert_unique(&mut unit_ids, &unit.name, id, file)?;

        for content in &unit.contents {
            let count = content.to_count();
            network.set_contents(id, count.signal, count.count);
        }
        if !unit.route.is_empty() {
            for waypoint in &unit.route {
                station_ref(&station_ids, &waypoint.station, file)?;
            }
            let mut route = RouteSpec::new(unit.route.iter().map(|w| w.to_waypoint()).collect());
            route.current = unit.current;
            network
                .set_route(id, route)
                .map_err(|e| DataLoadError::Parse {
                    file: file.to_path_buf(),
                    detail: e.to_string(),
                })?;
        }
        if unit.limiter.is_some() {
            network
                .set_capacity_limiter(id, unit.limiter)
                .map_err(|e| DataLoadError::Parse {
                    file: file.to_path_buf(),
                    detail: e.to_string(),
                })?;
        }
    }

    Ok(Scenario {
        config,
        network,
        station_ids,
        unit_ids,
    })
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use autotrain_core::network::StationRegistry;
    use autotrain_core::signal::ResourceSignal;
    use std::fs;

    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "autotrain_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    const SHUTTLE_RON: &str = r#"#![enable(implicit_some)]
(
    items: [(name: "iron-plate", stack_size: 100)],
    stations: [
        (name: "Depot", role: depot),
        (name: "Mine", role: supply, green: [(name: "iron-plate", count: 5000)]),
        (name: "Smelter", role: demand, red: [(name: "iron-plate", count: 5000)]),
    ],
    units: [(name: "T1", kind: bulk_carrier, at: "Depot")],
)"#;

    // -----------------------------------------------------------------------
    // File discovery
    // -----------------------------------------------------------------------

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = make_test_dir("unsupported");
        let path = dir.join("network.yaml");
        fs::write(&path, "stations: []").unwrap();
        let result: Result<NetworkData, _> = deserialize_file(&path);
        assert!(matches!(result, Err(DataLoadError::UnsupportedFormat { .. })));
        cleanup(&dir);
    }

    #[test]
    fn find_data_file_found_and_missing() {
        let dir = make_test_dir("find");
        assert_eq!(find_data_file(&dir, "network").unwrap(), None);
        fs::write(dir.join("network.toml"), "").unwrap();
        assert_eq!(
            find_data_file(&dir, "network").unwrap(),
            Some(dir.join("network.toml"))
        );
        cleanup(&dir);
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("conflict");
        fs::write(dir.join("network.ron"), "()").unwrap();
        fs::write(dir.join("network.json"), "{}").unwrap();
        assert!(matches!(
            find_data_file(&dir, "network"),
            Err(DataLoadError::ConflictingFormats { .. })
        ));
        cleanup(&dir);
    }

    #[test]
    fn missing_network_file() {
        let dir = make_test_dir("require_missing");
        fs::write(dir.join("network.yaml"), "stations: []").unwrap();
        let result = load_scenario(&dir);
        assert!(
            matches!(result, Err(DataLoadError::MissingRequired { ref file, .. }) if file == "network")
        );
        cleanup(&dir);
    }

    #[test]
    fn deserialize_file_parse_error() {
        let dir = make_test_dir("parse_err");
        let path = dir.join("network.ron");
        fs::write(&path, "this is not valid RON {{{").unwrap();
        let result: Result<NetworkData, _> = deserialize_file(&path);
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));
        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // load_config
    // -----------------------------------------------------------------------

    #[test]
    fn missing_config_uses_defaults() {
        let dir = make_test_dir("config_default");
        assert_eq!(load_config(&dir).unwrap(), ControllerConfig::default());
        cleanup(&dir);
    }

    #[test]
    fn partial_toml_config() {
        let dir = make_test_dir("config_toml");
        fs::write(
            dir.join("controller.toml"),
            "interval = 30\n\n[markers]\ndepot = \"signal-P\"\n",
        )
        .unwrap();
        let config = load_config(&dir).unwrap();
        assert_eq!(config.interval, 30);
        assert_eq!(config.markers.depot, "signal-P");
        assert_eq!(config.markers.demand, "signal-D");
        assert_eq!(config.default_wagon_slots, 40);
        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // load_scenario
    // -----------------------------------------------------------------------

    #[test]
    fn load_ron_scenario() {
        let dir = make_test_dir("scenario_ron");
        fs::write(dir.join("network.ron"), SHUTTLE_RON).unwrap();

        let scenario = load_scenario(&dir).unwrap();
        assert_eq!(scenario.network.stations().len(), 3);
        let mine = scenario.station("Mine").unwrap();
        assert_eq!(
            scenario.network.signal(
                mine,
                WireColor::Green,
                &ResourceSignal::item("iron-plate")
            ),
            5000
        );
        let unit = scenario.unit("T1").unwrap();
        assert_eq!(
            scenario.network.current_station(unit),
            scenario.station("Depot")
        );
        cleanup(&dir);
    }

    #[test]
    fn role_marker_follows_config() {
        let dir = make_test_dir("scenario_markers");
        fs::write(dir.join("network.ron"), SHUTTLE_RON).unwrap();
        fs::write(
            dir.join("controller.ron"),
            r#"(markers: (depot: "signal-P"))"#,
        )
        .unwrap();

        let scenario = load_scenario(&dir).unwrap();
        let depot = scenario.station("Depot").unwrap();
        assert_eq!(
            scenario.network.signal(
                depot,
                WireColor::Red,
                &ResourceSignal::virtual_signal("signal-P")
            ),
            1
        );
        cleanup(&dir);
    }

    #[test]
    fn unit_at_unknown_station() {
        let dir = make_test_dir("scenario_unresolved");
        fs::write(
            dir.join("network.json"),
            r#"{"stations": [], "units": [{"name": "T1", "kind": "bulk_carrier", "at": "Nowhere"}]}"#,
        )
        .unwrap();
        let result = load_scenario(&dir);
        assert!(matches!(
            result,
            Err(DataLoadError::UnresolvedRef { ref name, expected_kind: "station", .. }) if name == "Nowhere"
        ));
        cleanup(&dir);
    }

    #[test]
    fn duplicate_station_name() {
        let dir = make_test_dir("scenario_dup");
        fs::write(
            dir.join("network.json"),
            r#"{"stations": [{"name": "A"}, {"name": "A"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            load_scenario(&dir),
            Err(DataLoadError::DuplicateName { ref name, .. }) if name == "A"
        ));
        cleanup(&dir);
    }

    #[test]
    fn invalid_stack_size_is_rejected() {
        let dir = make_test_dir("scenario_catalog");
        fs::write(
            dir.join("network.json"),
            r#"{"items": [{"name": "iron-plate", "stack_size": 0}]}"#,
        )
        .unwrap();
        assert!(matches!(
            load_scenario(&dir),
            Err(DataLoadError::Catalog { .. })
        ));
        cleanup(&dir);
    }

    #[test]
    fn preloaded_route_and_cargo() {
        let dir = make_test_dir("scenario_route");
        fs::write(
            dir.join("network.toml"),
            r#"
[[stations]]
name = "Depot"
role = "depot"

[[stations]]
name = "Smelter"
role = "demand"

[[units]]
name = "T1"
kind = "bulk_carrier"
current = 1
limiter = 21

[[units.route]]
station = "Mine"
wait = "full"

[[units.route]]
station = "Smelter"
wait = "empty"

[[units.contents]]
name = "iron-plate"
count = 2000
"#,
        )
        .unwrap();

        // "Mine" does not exist.
        assert!(matches!(
            load_scenario(&dir),
            Err(DataLoadError::UnresolvedRef { ref name, .. }) if name == "Mine"
        ));

        let content = fs::read_to_string(dir.join("network.toml")).unwrap();
        fs::write(
            dir.join("network.toml"),
            format!("[[stations]]\nname = \"Mine\"\nrole = \"supply\"\n{content}"),
        )
        .unwrap();
        let scenario = load_scenario(&dir).unwrap();
        let unit = scenario.unit("T1").unwrap();
        let route = scenario.network.route(unit).unwrap();
        assert_eq!(route.current, 1);
        assert_eq!(route.pending_delivery(), Some("Smelter"));
        assert_eq!(scenario.network.capacity_limiter(unit), Some(21));
        assert_eq!(
            scenario
                .network
                .carried_contents(unit)
                .get(&ResourceSignal::item("iron-plate")),
            Some(&2000)
        );
        cleanup(&dir);
    }

    #[test]
    fn detached_wire_reads_as_absent() {
        let dir = make_test_dir("scenario_detached");
        fs::write(
            dir.join("network.json"),
            r#"{"stations": [{"name": "Mine", "role": "supply", "detached": ["green"]}]}"#,
        )
        .unwrap();
        let scenario = load_scenario(&dir).unwrap();
        let mine = scenario.station("Mine").unwrap();
        assert!(
            autotrain_core::network::SignalSource::read_network_signals(
                &scenario.network,
                mine,
                WireColor::Green
            )
            .is_none()
        );
        cleanup(&dir);
    }
}
