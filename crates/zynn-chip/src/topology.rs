//! Network topology: the per-layer node counts the register file describes.

/// Reference network input size (28×28 MNIST image).
pub const DEFAULT_NUM_IN: u16 = 784;
/// Reference network hidden layer 1 size.
pub const DEFAULT_NUM_H1: u16 = 16;
/// Reference network hidden layer 2 size.
pub const DEFAULT_NUM_H2: u16 = 16;
/// Reference network output size (10 digit classes).
pub const DEFAULT_NUM_OUT: u16 = 10;

/// Per-layer node counts for the two-hidden-layer MLP.
///
/// The accelerator performs no capacity validation — the fabric simply clocks
/// through whatever counts are programmed, so the caller is responsible for
/// staying within the synthesized limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    /// Input node count.
    pub num_inputs: u16,
    /// Hidden layer 1 size.
    pub num_hidden1: u16,
    /// Hidden layer 2 size.
    pub num_hidden2: u16,
    /// Output node count (one Q4.11 score per class).
    pub num_outputs: u16,
}

impl Topology {
    /// Construct a topology from explicit layer sizes.
    #[must_use]
    pub const fn new(num_inputs: u16, num_hidden1: u16, num_hidden2: u16, num_outputs: u16) -> Self {
        Self {
            num_inputs,
            num_hidden1,
            num_hidden2,
            num_outputs,
        }
    }
}

impl Default for Topology {
    /// The reference MNIST topology: 784-16-16-10.
    fn default() -> Self {
        Self::new(
            DEFAULT_NUM_IN,
            DEFAULT_NUM_H1,
            DEFAULT_NUM_H2,
            DEFAULT_NUM_OUT,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_reference_network() {
        let t = Topology::default();
        assert_eq!(t.num_inputs, 784);
        assert_eq!(t.num_hidden1, 16);
        assert_eq!(t.num_hidden2, 16);
        assert_eq!(t.num_outputs, 10);
    }
}
