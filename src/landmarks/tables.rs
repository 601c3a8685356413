//! Static landmark index tables.
//!
//! Indices refer to the 468-point face mesh and the 33-point pose model.
//! The tables are versioned; bump the version whenever an index set changes
//! so stored results can be traced back to the table that produced them.

use crate::pipeline::domain::zones::{FaceZone, PostureSegment};

pub const FACE_TABLE_VERSION: u32 = 2;
pub const POSE_TABLE_VERSION: u32 = 1;

pub const FACE_OVAL: [usize; 36] = [
    10, 338, 297, 332, 284, 251, 389, 356, 454, 323, 361, 288, 397, 365, 379, 378, 400, 377, 152,
    148, 176, 149, 150, 136, 172, 58, 132, 93, 234, 127, 162, 21, 54, 103, 67, 109,
];

pub const LEFT_EYE: [usize; 16] = [
    362, 382, 381, 380, 374, 373, 390, 249, 263, 466, 388, 387, 386, 385, 384, 398,
];

pub const RIGHT_EYE: [usize; 16] = [
    33, 7, 163, 144, 145, 153, 154, 155, 133, 173, 157, 158, 159, 160, 161, 246,
];

pub const LIPS_OUTER: [usize; 20] = [
    61, 146, 91, 181, 84, 17, 314, 405, 321, 375, 291, 409, 270, 269, 267, 0, 37, 39, 40, 185,
];

pub const FOREHEAD_CENTER: [usize; 6] = [151, 108, 69, 299, 337, 9];
pub const FOREHEAD_LEFT: [usize; 6] = [298, 333, 334, 296, 293, 300];
pub const FOREHEAD_RIGHT: [usize; 6] = [68, 104, 105, 66, 63, 70];
pub const LEFT_UNDER_EYE: [usize; 6] = [450, 451, 452, 453, 347, 348];
pub const RIGHT_UNDER_EYE: [usize; 6] = [230, 231, 232, 233, 118, 119];
pub const NOSE_BRIDGE: [usize; 6] = [6, 197, 195, 168, 122, 351];
pub const NOSE_TIP: [usize; 6] = [1, 4, 5, 45, 275, 44];
pub const LEFT_CHEEK: [usize; 6] = [425, 411, 427, 280, 330, 266];
pub const RIGHT_CHEEK: [usize; 6] = [205, 187, 207, 50, 101, 36];
pub const LEFT_JAW: [usize; 6] = [435, 401, 367, 364, 394, 430];
pub const RIGHT_JAW: [usize; 6] = [215, 177, 138, 135, 169, 210];
pub const CHIN: [usize; 6] = [199, 175, 428, 208, 171, 396];

/// Landmark indices outlining a face zone.
pub fn face_zone_indices(zone: FaceZone) -> &'static [usize] {
    match zone {
        FaceZone::ForeheadCenter => &FOREHEAD_CENTER,
        FaceZone::ForeheadLeft => &FOREHEAD_LEFT,
        FaceZone::ForeheadRight => &FOREHEAD_RIGHT,
        FaceZone::LeftUnderEye => &LEFT_UNDER_EYE,
        FaceZone::RightUnderEye => &RIGHT_UNDER_EYE,
        FaceZone::NoseBridge => &NOSE_BRIDGE,
        FaceZone::NoseTip => &NOSE_TIP,
        FaceZone::LeftCheek => &LEFT_CHEEK,
        FaceZone::RightCheek => &RIGHT_CHEEK,
        FaceZone::LeftJaw => &LEFT_JAW,
        FaceZone::RightJaw => &RIGHT_JAW,
        FaceZone::Chin => &CHIN,
    }
}

// Pose model indices.
pub const POSE_NOSE: usize = 0;
pub const POSE_LEFT_EAR: usize = 7;
pub const POSE_RIGHT_EAR: usize = 8;
pub const POSE_LEFT_SHOULDER: usize = 11;
pub const POSE_RIGHT_SHOULDER: usize = 12;
pub const POSE_LEFT_HIP: usize = 23;
pub const POSE_RIGHT_HIP: usize = 24;
pub const POSE_LEFT_KNEE: usize = 25;
pub const POSE_RIGHT_KNEE: usize = 26;
pub const POSE_LEFT_ANKLE: usize = 27;
pub const POSE_RIGHT_ANKLE: usize = 28;

/// Pose indices a posture segment is measured from.
pub fn posture_segment_indices(segment: PostureSegment) -> &'static [usize] {
    match segment {
        PostureSegment::Head => &[
            POSE_NOSE,
            POSE_LEFT_EAR,
            POSE_RIGHT_EAR,
            POSE_LEFT_SHOULDER,
            POSE_RIGHT_SHOULDER,
        ],
        PostureSegment::Shoulders => &[POSE_LEFT_SHOULDER, POSE_RIGHT_SHOULDER],
        PostureSegment::Spine => &[
            POSE_LEFT_SHOULDER,
            POSE_RIGHT_SHOULDER,
            POSE_LEFT_HIP,
            POSE_RIGHT_HIP,
        ],
        PostureSegment::Pelvis => &[POSE_LEFT_HIP, POSE_RIGHT_HIP],
        PostureSegment::Knees => &[
            POSE_LEFT_HIP,
            POSE_RIGHT_HIP,
            POSE_LEFT_KNEE,
            POSE_RIGHT_KNEE,
            POSE_LEFT_ANKLE,
            POSE_RIGHT_ANKLE,
        ],
    }
}
