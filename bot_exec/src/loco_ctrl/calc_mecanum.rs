//! Mecanum wheel mixing calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use hw_if::eqpt::mech::WheelPowers;

// Internal imports
use super::BodyCmd;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Mix a body-frame demand into power demands for the four mecanum wheels.
///
/// Pure and deterministic, the same command always produces the same powers.
pub fn mix(cmd: &BodyCmd) -> WheelPowers {
    mix_scaled(cmd).0
}

/// Mix a body-frame demand, also returning the divisor applied during
/// normalisation (1.0 when no scaling occurred).
pub fn mix_scaled(cmd: &BodyCmd) -> (WheelPowers, f64) {
    let fl = cmd.axial + cmd.lateral + cmd.yaw;
    let fr = cmd.axial - cmd.lateral - cmd.yaw;
    let bl = cmd.axial - cmd.lateral + cmd.yaw;
    let br = cmd.axial + cmd.lateral - cmd.yaw;

    // Largest magnitude across all four wheels. Always >= 0, so the division
    // below cannot be by zero.
    let max = fl.abs().max(fr.abs()).max(bl.abs()).max(br.abs());

    // Scale all four demands together so the largest magnitude becomes
    // exactly 1. The divisor is shared, never per wheel, preserving the
    // ratios between wheels and with them the direction of travel. Demands
    // already within range pass through untouched.
    if max > 1.0 {
        (
            WheelPowers {
                front_left: fl / max,
                front_right: fr / max,
                back_left: bl / max,
                back_right: br / max,
            },
            max,
        )
    }
    else {
        (
            WheelPowers {
                front_left: fl,
                front_right: fr,
                back_left: bl,
                back_right: br,
            },
            1.0,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn cmd(axial: f64, lateral: f64, yaw: f64) -> BodyCmd {
        BodyCmd { axial, lateral, yaw }
    }

    #[test]
    fn test_pure_axial() {
        let powers = mix(&cmd(1.0, 0.0, 0.0));
        assert_eq!(powers.front_left, 1.0);
        assert_eq!(powers.front_right, 1.0);
        assert_eq!(powers.back_left, 1.0);
        assert_eq!(powers.back_right, 1.0);
    }

    #[test]
    fn test_diagonal_strafe_scaled() {
        // Pre-scale demands are (2, 0, 0, 2), normalisation divides by 2
        let (powers, scale) = mix_scaled(&cmd(1.0, 1.0, 0.0));
        assert_eq!(scale, 2.0);
        assert_eq!(powers.front_left, 1.0);
        assert_eq!(powers.front_right, 0.0);
        assert_eq!(powers.back_left, 0.0);
        assert_eq!(powers.back_right, 1.0);
    }

    #[test]
    fn test_pure_yaw() {
        let powers = mix(&cmd(0.0, 0.0, 1.0));
        assert_eq!(powers.front_left, 1.0);
        assert_eq!(powers.front_right, -1.0);
        assert_eq!(powers.back_left, 1.0);
        assert_eq!(powers.back_right, -1.0);
    }

    #[test]
    fn test_in_range_demand_never_boosted() {
        let (powers, scale) = mix_scaled(&cmd(0.3, 0.1, 0.05));
        assert_eq!(scale, 1.0);
        assert_eq!(powers.front_left, 0.3 + 0.1 + 0.05);
        assert_eq!(powers.front_right, 0.3 - 0.1 - 0.05);
        assert_eq!(powers.back_left, 0.3 - 0.1 + 0.05);
        assert_eq!(powers.back_right, 0.3 + 0.1 - 0.05);
    }

    #[test]
    fn test_zero_demand() {
        let powers = mix(&BodyCmd::zero());
        assert_eq!(powers, WheelPowers::zero());
    }

    #[test]
    fn test_scaling_preserves_wheel_ratios() {
        let demand = cmd(1.0, 0.5, 0.25);
        let (powers, scale) = mix_scaled(&demand);

        // Pre-scale demands are (1.75, 0.25, 0.25, 1.25)
        assert_eq!(scale, 1.75);
        assert_eq!(powers.max_abs(), 1.0);
        assert!((powers.front_right / powers.front_left - 0.25 / 1.75).abs() < 1e-12);
        assert!((powers.back_right / powers.front_left - 1.25 / 1.75).abs() < 1e-12);
    }
}
