//! Human-readable names for well-known change paths.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const DEFAULT_LABELS: &[(&str, &str)] = &[
    ("order.vin", "VIN"),
    ("order.orderStatus", "Order Status"),
    ("order.ownerCompanyName", "Company"),
    ("order.mktOptions", "Options"),
    (
        "details.tasks.deliveryDetails.regData.reggieLicensePlate",
        "License Plate",
    ),
    (
        "details.tasks.scheduling.deliveryWindowDisplay",
        "Delivery Window",
    ),
    (
        "details.tasks.scheduling.apptDateTimeAddressStr",
        "Delivery Appointment",
    ),
    ("details.tasks.scheduling.deliveryType", "Delivery Method"),
    (
        "details.tasks.scheduling.deliveryAddressTitle",
        "Delivery Center",
    ),
    (
        "details.tasks.finalPayment.data.etaToDeliveryCenter",
        "ETA to Delivery Center",
    ),
    (
        "details.tasks.registration.orderDetails.vehicleRoutingLocation",
        "Vehicle Location",
    ),
    (
        "details.tasks.registration.orderDetails.vehicleOdometer",
        "Odometer",
    ),
    (
        "details.tasks.registration.orderDetails.reservationDate",
        "Reservation Date",
    ),
    (
        "details.tasks.registration.orderDetails.orderBookedDate",
        "Order Booked Date",
    ),
];

/// Path → label lookup. Unknown paths display as themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct DisplayLabels(IndexMap<String, String>);

impl Default for DisplayLabels {
    fn default() -> Self {
        Self(
            DEFAULT_LABELS
                .iter()
                .map(|(path, label)| ((*path).to_string(), (*label).to_string()))
                .collect(),
        )
    }
}

impl DisplayLabels {
    /// An empty table; every path displays raw.
    #[must_use]
    pub fn empty() -> Self {
        Self(IndexMap::new())
    }

    #[must_use]
    pub fn label_for<'a>(&'a self, path: &'a str) -> &'a str {
        self.0.get(path).map_or(path, String::as_str)
    }

    #[must_use]
    pub fn with_label(mut self, path: impl Into<String>, label: impl Into<String>) -> Self {
        self.0.insert(path.into(), label.into());
        self
    }

    /// Overlay `overrides` on top of this table.
    pub fn extend(&mut self, overrides: &IndexMap<String, String>) {
        for (path, label) in overrides {
            self.0.insert(path.clone(), label.clone());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_paths_have_labels() {
        let labels = DisplayLabels::default();
        assert_eq!(labels.label_for("order.vin"), "VIN");
        assert_eq!(
            labels.label_for("details.tasks.scheduling.deliveryWindowDisplay"),
            "Delivery Window"
        );
    }

    #[test]
    fn test_unknown_path_falls_back_to_raw() {
        let labels = DisplayLabels::default();
        assert_eq!(labels.label_for("order.somethingNew"), "order.somethingNew");
        assert_eq!(DisplayLabels::empty().label_for("order.vin"), "order.vin");
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let mut labels = DisplayLabels::default();
        let mut overrides = IndexMap::new();
        overrides.insert("order.vin".to_string(), "Vehicle ID".to_string());
        labels.extend(&overrides);
        assert_eq!(labels.label_for("order.vin"), "Vehicle ID");
        assert_eq!(labels.len(), DEFAULT_LABELS.len());
    }
}
