//! Pure calculation functions for variant dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::StepPolicy;

/// Derive a step count from the widest and the desired smallest width.
///
/// `round(max_width / min_width)`, never less than one step.
///
/// # Examples
/// ```
/// # use optimg::imaging::steps_for_min_width;
/// assert_eq!(steps_for_min_width(1000, 250), 4);
/// assert_eq!(steps_for_min_width(1000, 300), 3); // 3.33 → 3
/// assert_eq!(steps_for_min_width(100, 400), 1);  // never zero
/// ```
pub fn steps_for_min_width(max_width: u32, min_width: u32) -> u32 {
    if min_width == 0 {
        return 1;
    }
    let steps = (max_width as f64 / min_width as f64).round() as u32;
    steps.max(1)
}

/// Resolve the step count for one image of the given width.
pub fn resolve_steps(policy: StepPolicy, width: u32) -> u32 {
    match policy {
        StepPolicy::Fixed(steps) => steps.max(1),
        StepPolicy::MinWidth(min) => steps_for_min_width(width, min),
    }
}

/// One planned resize target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSize {
    /// Step index, `steps` for the full-size variant down to 1.
    pub step: u32,
    pub width: u32,
    pub height: u32,
}

/// Plan the dimensions of every variant, largest first.
///
/// Step `i` scales both edges by `i / steps`, truncating toward zero. The
/// arithmetic is done on integers so exact ratios stay exact (300 px at 2/3 is
/// 200, not 199). Edges are clamped to at least one pixel.
///
/// # Arguments
/// * `original` - Source dimensions (width, height)
/// * `steps` - Number of variants; zero is treated as one
///
/// # Examples
/// ```
/// # use optimg::imaging::plan_step_sizes;
/// let widths: Vec<u32> = plan_step_sizes((1000, 600), 4).iter().map(|s| s.width).collect();
/// assert_eq!(widths, vec![1000, 750, 500, 250]);
/// ```
pub fn plan_step_sizes(original: (u32, u32), steps: u32) -> Vec<StepSize> {
    let (orig_w, orig_h) = original;
    let steps = steps.max(1);

    (1..=steps)
        .rev()
        .map(|i| StepSize {
            step: i,
            width: scale_edge(orig_w, i, steps),
            height: scale_edge(orig_h, i, steps),
        })
        .collect()
}

fn scale_edge(edge: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled = u64::from(edge) * u64::from(numerator) / u64::from(denominator);
    (scaled as u32).max(1)
}
