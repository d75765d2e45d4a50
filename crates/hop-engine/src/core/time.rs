/// Splits a variable frame delta into bounded sub-steps.
/// Keeps a single long frame from moving a body far enough to skip past thin geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubSteps {
    /// Largest delta handed to one simulation step.
    max_step: f32,
    /// Cap on steps per frame; time beyond `max_step * max_steps` is dropped.
    max_steps: u32,
}

/// How one frame's delta was divided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    pub steps: u32,
    pub step_dt: f32,
    /// Seconds discarded because the frame exceeded the cap.
    pub dropped: f32,
}

impl SubSteps {
    pub fn new(max_step: f32, max_steps: u32) -> Self {
        Self {
            max_step,
            max_steps: max_steps.max(1),
        }
    }

    /// Divide `frame_dt` into equal steps no longer than `max_step`.
    /// A zero or negative delta yields a single zero-length step.
    pub fn plan(&self, frame_dt: f32) -> StepPlan {
        if frame_dt <= 0.0 || self.max_step <= 0.0 {
            return StepPlan { steps: 1, step_dt: frame_dt.max(0.0), dropped: 0.0 };
        }
        let budget = self.max_step * self.max_steps as f32;
        let usable = frame_dt.min(budget);
        let steps = ((usable / self.max_step).ceil() as u32).clamp(1, self.max_steps);
        StepPlan {
            steps,
            step_dt: usable / steps as f32,
            dropped: frame_dt - usable,
        }
    }

    pub fn max_step(&self) -> f32 {
        self.max_step
    }
}
