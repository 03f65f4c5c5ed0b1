/// Per-season numeric policy for the regional pool: pre-qualification and
/// decline lists, championship slot arithmetic, weekly quota shape.
#[derive(Debug, Clone)]
pub struct SeasonConstants {
    pub pre_qualified: &'static [u32],
    pub declined: &'static [u32],
    pub championship_slots: i64,
    pub pre_qualified_count: i64,
    pub total_team_count: i64,
    pub district_team_count: i64,
    /// Manual correction applied on top of the proportional slot count.
    pub regional_error: i64,
    pub regionals_count_per_week: [i64; 5],
    pub regionals_count: i64,
    /// Slots reserved per regional before the pool splits the remainder.
    pub iron_bowl: i64,
    pub weeks_error: [i64; 5],
    /// Per-event auto-advancement slots under the 2026 rules.
    pub event_auto_slots: usize,
}

impl SeasonConstants {
    pub fn open_slots(&self) -> i64 {
        self.championship_slots - self.pre_qualified_count
    }

    pub fn regional_team_count(&self) -> i64 {
        self.total_team_count - self.district_team_count
    }

    pub fn free_slots(&self) -> i64 {
        self.regional_team_count() - self.regionals_count * self.iron_bowl
    }

    pub fn regional_slots(&self) -> i64 {
        let proportional = self.open_slots() as f64 * self.regional_team_count() as f64
            / self.total_team_count as f64;
        proportional.floor() as i64 + self.regional_error
    }

    pub fn regionals_proportion_per_week(&self) -> [f64; 5] {
        self.regionals_count_per_week
            .map(|weekly| weekly as f64 / self.regionals_count as f64)
    }

    /// Fixed-slot quota per pool week, indexed by `week - 2`.
    pub fn weekly_slots(&self) -> [i64; 5] {
        let proportions = self.regionals_proportion_per_week();
        let mut slots = [0i64; 5];
        for (index, slot) in slots.iter_mut().enumerate() {
            *slot = (self.regional_slots() as f64 * proportions[index]
                + self.weeks_error[index] as f64)
                .floor() as i64;
        }
        slots
    }

    pub fn is_pre_qualified(&self, team_number: u32) -> bool {
        self.pre_qualified.contains(&team_number)
    }

    pub fn is_declined(&self, team_number: u32) -> bool {
        self.declined.contains(&team_number)
    }
}

const SEASON_2025: SeasonConstants = SeasonConstants {
    pre_qualified: &[
        3132, 4403, 1538, 9432, 987, 2638, 3990, 2614, 5985, 2438, 8159, 3478, 1902, 4613, 4522,
    ],
    declined: &[
        8557, 3986, 5528, 1339, 7536, 1787, 7433, 3544, 10541, 10142, 1493, 3166, 7021, 8169,
        8777, 9523, 5655, 10002, 6483, 7050, 329, 5584,
    ],
    championship_slots: 600,
    pre_qualified_count: 32,
    total_team_count: 3522,
    district_team_count: 1670,
    regional_error: -6,
    regionals_count_per_week: [18, 15, 14, 10, 12],
    regionals_count: 69,
    iron_bowl: 4,
    weeks_error: [-2, 4, 1, 0, 3],
    event_auto_slots: 3,
};

const SEASON_2026: SeasonConstants = SeasonConstants {
    pre_qualified: &[5985, 2486, 4613, 1816, 1902],
    declined: &[],
    championship_slots: 600,
    pre_qualified_count: 9,
    total_team_count: 3522,
    // California and Wisconsin converted to districts for 2026.
    district_team_count: 1670 + 289 + 69,
    regional_error: -6,
    regionals_count_per_week: [18, 15, 14, 10, 12],
    regionals_count: 80,
    iron_bowl: 3,
    weeks_error: [0, 0, 0, 0, 0],
    event_auto_slots: 3,
};

const DEFAULT_CONSTANTS: SeasonConstants = SeasonConstants {
    pre_qualified: &[],
    declined: &[],
    championship_slots: 600,
    pre_qualified_count: 32,
    total_team_count: 3522,
    district_team_count: 1670,
    regional_error: -6,
    regionals_count_per_week: [18, 15, 14, 10, 12],
    regionals_count: 69,
    iron_bowl: 4,
    weeks_error: [0, 0, 0, 0, 0],
    event_auto_slots: 3,
};

pub fn constants_for(season: u32) -> &'static SeasonConstants {
    match season {
        2025 => &SEASON_2025,
        2026 => &SEASON_2026,
        _ => &DEFAULT_CONSTANTS,
    }
}
