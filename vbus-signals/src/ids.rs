//!
//! The Vehicle-Wide Signal Identifier Table.
//!
//! Identifiers are small positive integers carried in the frame header,
//! unique across the whole vehicle.  Every controller compiles against this
//! exact table so a receiver decodes a given identifier's payload the same
//! way regardless of which node sent it.  Changing a row is a
//! compatibility break for the entire network: additions go at the end and
//! nothing is ever renumbered.
//!

/// The semantic kind of a signal's payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalKind {
    /// A 32-bit unsigned integer payload
    Unsigned,
    /// A 32-bit signed integer payload
    Signed,
    /// A 32-bit IEEE-754 payload
    Float,
    /// A single on/off byte
    Flag,
}

impl SignalKind {
    /// The exact number of payload bytes a value of this kind occupies
    /// on the wire.
    pub fn payload_len(self) -> usize {
        match self {
            SignalKind::Unsigned | SignalKind::Signed | SignalKind::Float => 4,
            SignalKind::Flag => 1,
        }
    }
}

/// One row of the signal definition table.
pub struct SignalDef {
    /// The signal this row defines
    pub id: SignalId,
    /// The payload kind every node must encode and decode this signal with
    pub kind: SignalKind,
    /// A stable lower-snake name for logs and data files
    pub name: &'static str,
}

// The enum, the definition table, and the per-signal accessors are all
// generated from one invocation so a row can never fall out of sync with
// its variant.
macro_rules! signal_table {
    ($($(#[$meta:meta])* $variant:ident = $wire:literal => $kind:ident, $name:literal;)+) => {
        /// Every named signal exchanged on the vehicle bus.
        ///
        /// The discriminant is the wire identifier.  Gaps in the numbering
        /// are reserved ranges from earlier seasons of the vehicle and must
        /// not be reused.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum SignalId {
            $($(#[$meta])* $variant = $wire,)+
        }

        /// The full signal definition table, one row per [`SignalId`].
        ///
        /// This table is the single source of truth for receive dispatch:
        /// the signal table indexes it once at startup and decodes every
        /// inbound frame through it, so no hand-maintained per-identifier
        /// branch exists anywhere else.
        pub const SIGNAL_DEFS: &[SignalDef] = &[
            $(SignalDef {
                id: SignalId::$variant,
                kind: SignalKind::$kind,
                name: $name,
            },)+
        ];

        impl SignalId {
            /// The identifier carried in the frame header for this signal.
            pub fn wire(self) -> u16 {
                self as u16
            }

            /// The payload kind for this signal.
            pub fn kind(self) -> SignalKind {
                match self {
                    $(SignalId::$variant => SignalKind::$kind,)+
                }
            }

            /// A stable lower-snake name for logs and data files.
            pub fn name(self) -> &'static str {
                match self {
                    $(SignalId::$variant => $name,)+
                }
            }

            /// Resolve a raw wire identifier, if it names a known signal.
            pub fn from_wire(wire: u16) -> Option<Self> {
                match wire {
                    $($wire => Some(SignalId::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

signal_table! {
    /// Drivetrain primary shaft speed (rpm)
    PrimaryRpm = 0x01 => Unsigned, "primary_rpm";
    /// Drivetrain secondary shaft speed (rpm)
    SecondaryRpm = 0x02 => Unsigned, "secondary_rpm";
    /// Drivetrain primary-side temperature (deg C)
    PrimaryTemperature = 0x03 => Signed, "primary_temperature";
    /// Drivetrain secondary-side temperature (deg C)
    SecondaryTemperature = 0x04 => Signed, "secondary_temperature";
    /// Front-left wheel linear speed (mph)
    FrontLeftWheelSpeed = 0x0B => Float, "front_left_wheel_speed";
    /// Front-right wheel linear speed (mph)
    FrontRightWheelSpeed = 0x0C => Float, "front_right_wheel_speed";
    /// Rear-left wheel linear speed (mph)
    RearLeftWheelSpeed = 0x0D => Float, "rear_left_wheel_speed";
    /// Rear-right wheel linear speed (mph)
    RearRightWheelSpeed = 0x0E => Float, "rear_right_wheel_speed";
    /// Front-left wheel traction condition
    FrontLeftWheelCondition = 0x0F => Unsigned, "front_left_wheel_condition";
    /// Front-right wheel traction condition
    FrontRightWheelCondition = 0x10 => Unsigned, "front_right_wheel_condition";
    /// Rear-left wheel traction condition
    RearLeftWheelCondition = 0x11 => Unsigned, "rear_left_wheel_condition";
    /// Rear-right wheel traction condition
    RearRightWheelCondition = 0x12 => Unsigned, "rear_right_wheel_condition";
    /// Throttle pedal position (percent)
    ThrottlePercent = 0x15 => Unsigned, "throttle_percent";
    /// Brake pedal position (percent)
    BrakePercent = 0x16 => Unsigned, "brake_percent";
    /// Front brake line pressure (psi)
    FrontBrakePressure = 0x17 => Unsigned, "front_brake_pressure";
    /// Rear brake line pressure (psi)
    RearBrakePressure = 0x18 => Unsigned, "rear_brake_pressure";
    /// Front-left suspension displacement (in)
    FrontLeftDisplacement = 0x1F => Float, "front_left_displacement";
    /// Front-right suspension displacement (in)
    FrontRightDisplacement = 0x20 => Float, "front_right_displacement";
    /// Rear-left suspension displacement (in)
    RearLeftDisplacement = 0x21 => Float, "rear_left_displacement";
    /// Rear-right suspension displacement (in)
    RearRightDisplacement = 0x22 => Float, "rear_right_displacement";
    /// Chassis acceleration, X axis (g)
    AccelerationX = 0x29 => Float, "acceleration_x";
    /// Chassis acceleration, Y axis (g)
    AccelerationY = 0x2A => Float, "acceleration_y";
    /// Chassis acceleration, Z axis (g)
    AccelerationZ = 0x2B => Float, "acceleration_z";
    /// Chassis roll rate (deg/s)
    GyroRoll = 0x2C => Float, "gyro_roll";
    /// Chassis pitch rate (deg/s)
    GyroPitch = 0x2D => Float, "gyro_pitch";
    /// Chassis yaw rate (deg/s)
    GyroYaw = 0x2E => Float, "gyro_yaw";
    /// GPS latitude (decimal degrees)
    GpsLatitude = 0x2F => Float, "gps_latitude";
    /// GPS longitude (decimal degrees)
    GpsLongitude = 0x30 => Float, "gps_longitude";
    /// GPS time of day, hour
    GpsHour = 0x31 => Unsigned, "gps_hour";
    /// GPS time of day, minute
    GpsMinute = 0x32 => Unsigned, "gps_minute";
    /// GPS time of day, second
    GpsSecond = 0x33 => Unsigned, "gps_second";
    /// GPS date, month
    GpsMonth = 0x34 => Unsigned, "gps_month";
    /// GPS date, day
    GpsDay = 0x35 => Unsigned, "gps_day";
    /// GPS date, year
    GpsYear = 0x36 => Unsigned, "gps_year";
    /// GPS altitude (m)
    GpsAltitude = 0x37 => Signed, "gps_altitude";
    /// GPS heading (deg)
    GpsHeading = 0x38 => Unsigned, "gps_heading";
    /// GPS ground speed (m/s)
    GpsGroundSpeed = 0x39 => Unsigned, "gps_ground_speed";
    /// Auxiliary battery charge (percent)
    BatteryPercent = 0x3A => Unsigned, "battery_percent";
    /// Whether on-vehicle data logging is running
    LoggingActive = 0x42 => Flag, "logging_active";
    /// Operator request to snapshot the data screen
    ScreenshotRequest = 0x43 => Flag, "screenshot_request";
}
