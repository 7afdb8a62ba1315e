//! Input Capture
//!
//! Per-tick keyboard snapshot and its conversion into player velocity.
//! Direction keys are held states; jump and camera flip are one-shot edges
//! that the host sets only on the tick the key went down.

use serde::{Serialize, Deserialize};

// =============================================================================
// CONFLICT POLICY
// =============================================================================

/// What happens when both keys of one axis are held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Opposite keys cancel to zero.
    #[default]
    CancelToZero,
    /// The later-checked key wins: right over left, forward over back.
    LastWins,
    /// The first-checked key wins: left over right, back over forward.
    FirstWins,
}

// =============================================================================
// INPUT FRAME
// =============================================================================

/// Input state for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct InputFrame {
    /// Packed key flags:
    /// - Bit 0: Left held (A)
    /// - Bit 1: Right held (D)
    /// - Bit 2: Forward held (W), toward negative z
    /// - Bit 3: Back held (S), toward positive z
    /// - Bit 4: Jump pressed this tick
    /// - Bit 5: Camera flip pressed this tick
    /// - Bit 6-7: Reserved
    pub flags: u8,
}

impl InputFrame {
    /// Left flag bit
    pub const FLAG_LEFT: u8 = 0x01;
    /// Right flag bit
    pub const FLAG_RIGHT: u8 = 0x02;
    /// Forward flag bit
    pub const FLAG_FORWARD: u8 = 0x04;
    /// Back flag bit
    pub const FLAG_BACK: u8 = 0x08;
    /// Jump flag bit
    pub const FLAG_JUMP: u8 = 0x10;
    /// Camera flip flag bit
    pub const FLAG_CAMERA_FLIP: u8 = 0x20;

    const DIRECTION_MASK: u8 =
        Self::FLAG_LEFT | Self::FLAG_RIGHT | Self::FLAG_FORWARD | Self::FLAG_BACK;

    /// Create an empty input frame.
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Create from raw flags.
    pub const fn from_flags(flags: u8) -> Self {
        Self { flags }
    }

    /// Builder: hold left.
    pub const fn with_left(self) -> Self {
        Self::from_flags(self.flags | Self::FLAG_LEFT)
    }

    /// Builder: hold right.
    pub const fn with_right(self) -> Self {
        Self::from_flags(self.flags | Self::FLAG_RIGHT)
    }

    /// Builder: hold forward.
    pub const fn with_forward(self) -> Self {
        Self::from_flags(self.flags | Self::FLAG_FORWARD)
    }

    /// Builder: hold back.
    pub const fn with_back(self) -> Self {
        Self::from_flags(self.flags | Self::FLAG_BACK)
    }

    /// Builder: press jump this tick.
    pub const fn with_jump(self) -> Self {
        Self::from_flags(self.flags | Self::FLAG_JUMP)
    }

    /// Builder: press camera flip this tick.
    pub const fn with_camera_flip(self) -> Self {
        Self::from_flags(self.flags | Self::FLAG_CAMERA_FLIP)
    }

    /// Check if left is held.
    #[inline]
    pub fn left(&self) -> bool {
        self.flags & Self::FLAG_LEFT != 0
    }

    /// Check if right is held.
    #[inline]
    pub fn right(&self) -> bool {
        self.flags & Self::FLAG_RIGHT != 0
    }

    /// Check if forward is held.
    #[inline]
    pub fn forward(&self) -> bool {
        self.flags & Self::FLAG_FORWARD != 0
    }

    /// Check if back is held.
    #[inline]
    pub fn back(&self) -> bool {
        self.flags & Self::FLAG_BACK != 0
    }

    /// Check if jump was pressed this tick.
    #[inline]
    pub fn jump_pressed(&self) -> bool {
        self.flags & Self::FLAG_JUMP != 0
    }

    /// Check if camera flip was pressed this tick.
    #[inline]
    pub fn camera_flip_pressed(&self) -> bool {
        self.flags & Self::FLAG_CAMERA_FLIP != 0
    }

    /// Check if any direction key is held.
    #[inline]
    pub fn has_movement(&self) -> bool {
        self.flags & Self::DIRECTION_MASK != 0
    }

    /// Directional or jump input; this starts a fresh session.
    #[inline]
    pub fn starts_session(&self) -> bool {
        self.has_movement() || self.jump_pressed()
    }

    /// Check if this is an idle frame (no input).
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0
    }

    /// Player `(velocity.x, velocity.z)` for this tick.
    ///
    /// Values are set, not accumulated: releasing every key stops the
    /// player at once.
    pub fn horizontal_velocity(&self, speed: f64, policy: ConflictPolicy) -> (f64, f64) {
        // Left is -x, forward is -z
        let x = resolve_axis(self.left(), self.right(), policy, true);
        let z = resolve_axis(self.forward(), self.back(), policy, false);
        (x * speed, z * speed)
    }
}

/// Resolve one axis to -1, 0 or +1.
///
/// `negative_checked_first` is the key order the two ordered policies
/// assume on this axis: left before right, back before forward.
fn resolve_axis(negative: bool, positive: bool, policy: ConflictPolicy, negative_checked_first: bool) -> f64 {
    match (negative, positive) {
        (false, false) => 0.0,
        (true, false) => -1.0,
        (false, true) => 1.0,
        (true, true) => match policy {
            ConflictPolicy::CancelToZero => 0.0,
            ConflictPolicy::LastWins => {
                if negative_checked_first { 1.0 } else { -1.0 }
            }
            ConflictPolicy::FirstWins => {
                if negative_checked_first { -1.0 } else { 1.0 }
            }
        },
    }
}

// =============================================================================
// INPUT BUFFER
// =============================================================================

/// Input change entry: `frame` applies from `tick` until the next entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this input state began
    pub tick: u64,
    /// The new input state
    pub frame: InputFrame,
}

/// Delta-compressed input recording for one run.
///
/// Only stores ticks where input CHANGED, so held keys cost nothing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputBuffer {
    /// Ticks recorded so far
    pub len: u64,

    deltas: Vec<InputDelta>,
}

impl InputBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record input for the next tick.
    pub fn push(&mut self, frame: InputFrame) {
        let tick = self.len;
        self.len += 1;

        if !matches!(self.deltas.last(), Some(last) if last.frame == frame) {
            self.deltas.push(InputDelta { tick, frame });
        }
    }

    /// Get input at a specific tick.
    pub fn get_input_at(&self, tick: u64) -> InputFrame {
        let idx = self.deltas.partition_point(|d| d.tick <= tick);
        if idx == 0 {
            InputFrame::new()
        } else {
            self.deltas[idx - 1].frame
        }
    }

    /// Iterate every recorded tick's input.
    pub fn iter(&self) -> impl Iterator<Item = InputFrame> + '_ {
        (0..self.len).map(move |t| self.get_input_at(t))
    }

    /// All deltas.
    pub fn deltas(&self) -> &[InputDelta] {
        &self.deltas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let input = InputFrame::new().with_left().with_jump();
        assert!(input.left());
        assert!(!input.right());
        assert!(input.jump_pressed());
        assert!(input.has_movement());
        assert!(input.starts_session());
        assert!(!input.is_idle());
        assert!(InputFrame::new().is_idle());
    }

    #[test]
    fn test_camera_flip_does_not_start_session() {
        let input = InputFrame::new().with_camera_flip();
        assert!(input.camera_flip_pressed());
        assert!(!input.starts_session());
    }

    #[test]
    fn test_jump_alone_starts_session() {
        assert!(InputFrame::new().with_jump().starts_session());
    }

    #[test]
    fn test_single_direction_velocity() {
        let policy = ConflictPolicy::CancelToZero;
        assert_eq!(InputFrame::new().with_left().horizontal_velocity(0.05, policy), (-0.05, 0.0));
        assert_eq!(InputFrame::new().with_right().horizontal_velocity(0.05, policy), (0.05, 0.0));
        assert_eq!(InputFrame::new().with_forward().horizontal_velocity(0.05, policy), (0.0, -0.05));
        assert_eq!(InputFrame::new().with_back().horizontal_velocity(0.05, policy), (0.0, 0.05));
        assert_eq!(
            InputFrame::new().with_left().with_back().horizontal_velocity(0.05, policy),
            (-0.05, 0.05)
        );
        assert_eq!(InputFrame::new().horizontal_velocity(0.05, policy), (0.0, 0.0));
    }

    #[test]
    fn test_conflicting_keys_per_policy() {
        let all = InputFrame::new().with_left().with_right().with_forward().with_back();

        assert_eq!(all.horizontal_velocity(0.05, ConflictPolicy::CancelToZero), (0.0, 0.0));
        assert_eq!(all.horizontal_velocity(0.05, ConflictPolicy::LastWins), (0.05, -0.05));
        assert_eq!(all.horizontal_velocity(0.05, ConflictPolicy::FirstWins), (-0.05, 0.05));
    }

    #[test]
    fn test_policy_deserializes_snake_case() {
        let policy: ConflictPolicy = serde_json::from_str("\"last_wins\"").unwrap();
        assert_eq!(policy, ConflictPolicy::LastWins);
    }

    #[test]
    fn test_input_buffer_delta_compression() {
        let mut buffer = InputBuffer::new();
        let left = InputFrame::new().with_left();

        for _ in 0..100 {
            buffer.push(left);
        }
        buffer.push(left.with_jump());
        for _ in 0..50 {
            buffer.push(InputFrame::new());
        }

        assert_eq!(buffer.len, 151);
        assert_eq!(buffer.deltas().len(), 3);
        assert_eq!(buffer.get_input_at(0), left);
        assert_eq!(buffer.get_input_at(99), left);
        assert_eq!(buffer.get_input_at(100), left.with_jump());
        assert_eq!(buffer.get_input_at(101), InputFrame::new());

        let replayed: Vec<InputFrame> = buffer.iter().collect();
        assert_eq!(replayed.len(), 151);
        assert_eq!(replayed[100], left.with_jump());
    }

    #[test]
    fn test_input_buffer_serde_roundtrip_keeps_playback() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputFrame::new());
        buffer.push(InputFrame::new().with_back());

        let json = serde_json::to_string(&buffer).unwrap();
        let parsed: InputBuffer = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.get_input_at(1), InputFrame::new().with_back());
        assert_eq!(parsed.len, 2);
        assert_eq!(parsed, buffer);

        // Recording resumes against the last stored delta
        let mut resumed = parsed;
        resumed.push(InputFrame::new().with_back());
        assert_eq!(resumed.deltas().len(), 2);
        assert_eq!(resumed.len, 3);
    }
}
