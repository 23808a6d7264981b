//! Render-pass membership bitmask.

bitflags! {
    /// The logical render passes a node takes part in.
    ///
    /// Every pass renders the nodes whose layers intersect its mask. The
    /// [`BLOOM`](Layers::BLOOM) bit is the glow-membership tag used by the
    /// selective bloom compositor.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Layers: u32 {
        /// Rendered by the regular scene passes.
        const DEFAULT = 1 << 0;
        /// Glow-tagged: keeps its material during the glow pass.
        const BLOOM = 1 << 1;
    }
}

impl Default for Layers {
    fn default() -> Self {
        Layers::DEFAULT
    }
}

impl Layers {
    /// Whether a node on these layers is glow-tagged.
    #[inline]
    pub fn is_bloom(self) -> bool {
        self.contains(Layers::BLOOM)
    }

    /// Whether a pass rendering `mask` includes a node on these layers.
    #[inline]
    pub fn test(self, mask: Layers) -> bool {
        self.intersects(mask)
    }
}
