pub mod body;
pub mod confidence;
pub mod personal_color;
pub mod posture;
pub mod skin_type;
