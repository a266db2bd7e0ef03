use crate::config::DEFAULT_DESIRED_SPEED_KMH;
use crate::types::{Color, Junction, Phase, Signal};

use Color::{Green, Red, Yellow};

fn phase(id: i64, signals: &[(i64, Color)]) -> Phase {
    Phase::new(id, signals.iter().map(|&(d, c)| Signal::new(d, c)).collect())
}

/// Four-junction corridor bundled for demos; every cycle is 85 s long.
#[must_use]
pub fn demo_junctions() -> Vec<Junction> {
    vec![
        Junction::new(
            0,
            "Junction 1",
            vec![phase(0, &[(30, Green), (20, Red)]), phase(1, &[(20, Green), (15, Red)])],
        )
        .at(0.0, 0.0),
        Junction::new(
            1,
            "Junction 2",
            vec![
                phase(10, &[(20, Red), (35, Green), (5, Yellow)]),
                phase(11, &[(10, Red), (10, Green), (5, Yellow)]),
            ],
        )
        .at(0.0, 200.0),
        Junction::new(
            2,
            "Junction 3",
            vec![
                phase(20, &[(45, Red), (10, Green)]),
                phase(21, &[(7, Red), (18, Green), (5, Yellow)]),
            ],
        )
        .at(0.0, 450.0),
        Junction::new(
            3,
            "Junction 4",
            vec![phase(20, &[(40, Red), (15, Green)]), phase(21, &[(10, Red), (20, Green)])],
        )
        .at(0.0, 600.0),
    ]
}

#[must_use]
pub const fn demo_desired_speed_kmh() -> f64 {
    DEFAULT_DESIRED_SPEED_KMH
}
