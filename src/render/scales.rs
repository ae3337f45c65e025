//! Domain helpers shared by the chart renderers.

/// Round `max` up to a "nice" bound using roughly ten ticks (1, 2, 5 or 10 × 10^k)
pub fn nice_upper(max: f64) -> f64 {
    if !max.is_finite() || max <= 0.0 {
        return 1.0;
    }
    let raw_step = max / 10.0;
    let power = 10f64.powi(raw_step.log10().floor() as i32);
    let error = raw_step / power;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    let step = factor * power;
    (max / step).ceil() * step
}

/// Continuous x domain covering `years`.
///
/// A single year is widened by half a year each side; no years gives `0..1`.
pub fn year_domain<I: IntoIterator<Item = i32>>(years: I) -> (f64, f64) {
    let mut bounds: Option<(i32, i32)> = None;
    for year in years {
        bounds = Some(match bounds {
            Some((lo, hi)) => (lo.min(year), hi.max(year)),
            None => (year, year),
        });
    }
    match bounds {
        None => (0.0, 1.0),
        Some((lo, hi)) if lo == hi => (lo as f64 - 0.5, hi as f64 + 0.5),
        Some((lo, hi)) => (lo as f64, hi as f64),
    }
}

/// Split `[left, right]` into one band per sorted x position, with edges at
/// the midpoints between neighbours. Returns `(x0, x1)` per position.
pub fn midpoint_bands(positions: &[f64], left: f64, right: f64) -> Vec<(f64, f64)> {
    positions
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let x0 = if i == 0 { left } else { (positions[i - 1] + x) / 2.0 };
            let x1 = if i + 1 == positions.len() { right } else { (x + positions[i + 1]) / 2.0 };
            (x0, x1)
        })
        .collect()
}

/// Grouped band layout on a continuous axis where group `g` is centred on `g`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupedBands {
    pub members: usize,
    /// Gap between groups as a fraction of one group slot
    pub group_padding: f64,
    /// Inner and outer padding between members, as a fraction of a member step
    pub member_padding: f64,
}

impl GroupedBands {
    pub fn new(members: usize) -> Self {
        Self {
            members,
            group_padding: 0.1,
            member_padding: 0.05,
        }
    }

    /// Axis range that holds `groups` groups
    pub fn domain(groups: usize) -> (f64, f64) {
        (-0.5, groups as f64 - 0.5)
    }

    /// Horizontal extent of member `member` inside group `group`
    pub fn span(&self, group: usize, member: usize) -> (f64, f64) {
        let width = 1.0 - self.group_padding;
        let start = group as f64 - width / 2.0;
        let n = self.members.max(1) as f64;
        let step = width / (n + self.member_padding);
        let bandwidth = step * (1.0 - self.member_padding);
        let x0 = start + step * self.member_padding + step * member as f64;
        (x0, x0 + bandwidth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_upper() {
        assert_eq!(nice_upper(39814.3), 40000.0);
        assert_eq!(nice_upper(222.6), 240.0);
        assert_eq!(nice_upper(100.0), 100.0);
        assert_eq!(nice_upper(0.0), 1.0);
        assert_eq!(nice_upper(f64::NAN), 1.0);
    }

    #[test]
    fn test_year_domain() {
        assert_eq!(year_domain(vec![2020, 1970, 1990]), (1970.0, 2020.0));
        assert_eq!(year_domain(vec![1990]), (1989.5, 1990.5));
        assert_eq!(year_domain(Vec::new()), (0.0, 1.0));
    }

    // Bands tile the range and ties fall to the earlier position
    #[test]
    fn test_midpoint_bands() {
        let bands = midpoint_bands(&[0.0, 10.0, 30.0], -5.0, 40.0);
        assert_eq!(bands, vec![(-5.0, 5.0), (5.0, 20.0), (20.0, 40.0)]);
        assert_eq!(midpoint_bands(&[3.0], 0.0, 6.0), vec![(0.0, 6.0)]);
    }

    #[test]
    fn test_grouped_bands_stay_inside_group() {
        let bands = GroupedBands::new(2);
        for group in 0..4 {
            let (a0, a1) = bands.span(group, 0);
            let (b0, b1) = bands.span(group, 1);
            let g = group as f64;
            assert!(a0 > g - 0.5 && b1 < g + 0.5);
            assert!(a1 < b0, "members overlap");
            assert!(((a1 - a0) - (b1 - b0)).abs() < 1e-12);
            // symmetric around the group centre
            assert!(((g - a0) - (b1 - g)).abs() < 1e-12);
        }
        assert_eq!(GroupedBands::domain(4), (-0.5, 3.5));
    }
}
