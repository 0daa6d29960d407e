//! Static sensor catalog.
//!
//! One table holds the display label, chart colour, and unit for every
//! sensor the dashboard knows about. Views look sensors up here instead
//! of carrying their own copies of the mapping.

/// Display metadata for one sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorInfo {
    /// Canonical sensor identifier as it appears on the wire.
    pub id: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Hex colour used for the sensor's chart line.
    pub color: &'static str,
    /// Measurement unit.
    pub unit: &'static str,
}

/// Fallback colour for sensors missing from the catalog.
pub const DEFAULT_COLOR: &str = "#007bff";

/// Every sensor tracked by the dashboard.
pub const SENSORS: &[SensorInfo] = &[
    SensorInfo { id: "nitrogen", label: "Azote (N)", color: "#28a745", unit: "mg/kg" },
    SensorInfo { id: "phosphorus", label: "Phosphore (P)", color: "#ffc107", unit: "mg/kg" },
    SensorInfo { id: "potassium", label: "Potassium (K)", color: "#17a2b8", unit: "mg/kg" },
    SensorInfo { id: "ph", label: "pH", color: "#6f42c1", unit: "pH" },
    SensorInfo { id: "conductivity", label: "Conductivité", color: "#fd7e14", unit: "µS/cm" },
    SensorInfo { id: "temperature", label: "Température", color: "#dc3545", unit: "°C" },
    SensorInfo { id: "humidity", label: "Humidité", color: "#20c997", unit: "%" },
    SensorInfo { id: "salinity", label: "Salinité", color: "#6c757d", unit: "ppm" },
    SensorInfo { id: "water_level", label: "Niveau d'eau", color: "#007bff", unit: "%" },
    SensorInfo { id: "water_temperature", label: "Température eau", color: "#0dcaf0", unit: "°C" },
    SensorInfo { id: "water_flow", label: "Débit d'eau", color: "#198754", unit: "L/min" },
    SensorInfo { id: "water_pressure", label: "Pression eau", color: "#0d6efd", unit: "bar" },
];

/// Look up a sensor by its wire identifier.
pub fn find(id: &str) -> Option<&'static SensorInfo> {
    SENSORS.iter().find(|s| s.id == id)
}

/// `true` if the identifier names a known sensor.
pub fn is_known(id: &str) -> bool {
    find(id).is_some()
}

/// Display label for a sensor, falling back to the raw identifier.
pub fn label(id: &str) -> &str {
    find(id).map(|s| s.label).unwrap_or(id)
}

/// Chart colour for a sensor, falling back to [`DEFAULT_COLOR`].
pub fn color(id: &str) -> &'static str {
    find(id).map(|s| s.color).unwrap_or(DEFAULT_COLOR)
}

/// Measurement unit for a sensor, falling back to the empty string.
pub fn unit(id: &str) -> &'static str {
    find(id).map(|s| s.unit).unwrap_or("")
}
