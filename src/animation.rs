//! Easing curves, tweens and the emissive pulse played on hovered spheres.

use crate::resource::{MaterialHandle, ResourceManager};
use crate::scene::{NodeId, Scene};
use std::collections::HashMap;
use std::f32::consts::PI;

/// Easing curves mapping a progress in `[0, 1]` to `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,
    CubicOut,
    SineInOut,
}

impl Easing {
    /// Evaluates the curve at `t`, clamped to `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadraticIn => t * t,
            Easing::QuadraticOut => t * (2.0 - t),
            Easing::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Easing::SineInOut => 0.5 * (1.0 - (PI * t).cos()),
        }
    }
}

/// Interpolates a scalar over time.
///
/// A yoyo tween goes from `from` to `to` during the first half of its
/// duration and comes back during the second half.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    /// Total duration in seconds.
    pub duration: f32,
    /// Time elapsed since the start, in seconds.
    pub elapsed: f32,
    pub easing: Easing,
    pub yoyo: bool,
}

impl Tween {
    /// A one-way tween.
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Tween {
        Tween {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing,
            yoyo: false,
        }
    }

    /// Makes the tween come back to `from` at the end.
    pub fn with_yoyo(mut self, yoyo: bool) -> Tween {
        self.yoyo = yoyo;
        self
    }

    /// Progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    /// Whether the whole duration elapsed.
    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Current value.
    pub fn value(&self) -> f32 {
        let t = self.progress();
        let phase = if self.yoyo {
            if t < 0.5 {
                2.0 * t
            } else {
                2.0 - 2.0 * t
            }
        } else {
            t
        };

        self.from + (self.to - self.from) * self.easing.apply(phase)
    }

    /// Advances by `dt` seconds and returns the new value.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.value()
    }
}

#[derive(Clone, Copy, Debug)]
struct Pulse {
    material: MaterialHandle,
    resting: f32,
    tween: Tween,
}

/// Transient emissive ramps, at most one per node.
///
/// A pulse raises the emissive intensity of a node's material from its
/// resting value to `resting + boost` and back. When it ends the exact resting
/// value is written back.
#[derive(Clone, Debug)]
pub struct EmissivePulses {
    pulses: HashMap<NodeId, Pulse>,
    boost: f32,
    duration: f32,
    easing: Easing,
}

impl Default for EmissivePulses {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl EmissivePulses {
    /// Pulses adding `boost` at their peak, lasting `duration` seconds.
    pub fn new(boost: f32, duration: f32) -> EmissivePulses {
        EmissivePulses {
            pulses: HashMap::new(),
            boost,
            duration,
            easing: Easing::QuadraticInOut,
        }
    }

    /// Changes the easing of the pulses started from now on.
    pub fn with_easing(mut self, easing: Easing) -> EmissivePulses {
        self.easing = easing;
        self
    }

    /// Changes the peak boost of the pulses started from now on.
    pub fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    /// Peak boost.
    pub fn boost(&self) -> f32 {
        self.boost
    }

    /// Pulse duration in seconds.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Starts a pulse on `node`.
    ///
    /// Returns `false` when the node already pulses, is not a drawable, or its
    /// material has no emissive term.
    pub fn start(&mut self, node: NodeId, scene: &Scene, resources: &ResourceManager) -> bool {
        if self.pulses.contains_key(&node) {
            return false;
        }

        let Some(material) = scene.node(node).and_then(|n| n.drawable()).map(|d| d.material) else {
            return false;
        };
        let Some(resting) = resources.material(material).and_then(|m| m.emissive_intensity())
        else {
            return false;
        };

        let tween = Tween::new(resting, resting + self.boost, self.duration, self.easing)
            .with_yoyo(true);
        let _ = self.pulses.insert(
            node,
            Pulse {
                material,
                resting,
                tween,
            },
        );
        true
    }

    /// Advances every pulse by `dt` seconds, writing intensities into the
    /// materials. Pulses whose node or material vanished are dropped.
    pub fn update(&mut self, dt: f32, scene: &Scene, resources: &mut ResourceManager) {
        self.pulses.retain(|node, pulse| {
            if scene.node(*node).is_none() {
                return false;
            }
            let Some(material) = resources.material_mut(pulse.material) else {
                return false;
            };

            let value = pulse.tween.advance(dt);
            if pulse.tween.is_finished() {
                let _ = material.set_emissive_intensity(pulse.resting);
                false
            } else {
                let _ = material.set_emissive_intensity(value);
                true
            }
        });
    }

    /// Whether `node` is pulsing.
    pub fn is_active(&self, node: NodeId) -> bool {
        self.pulses.contains_key(&node)
    }

    /// Number of running pulses.
    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    /// Whether no pulse runs.
    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    /// Stops every pulse without touching the materials.
    pub fn clear(&mut self) {
        self.pulses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;
    use crate::procedural;
    use crate::resource::{Geometry, Material};
    use approx::assert_relative_eq;

    #[test]
    fn easings_hit_their_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::QuadraticIn,
            Easing::QuadraticOut,
            Easing::QuadraticInOut,
            Easing::CubicOut,
            Easing::SineInOut,
        ] {
            assert_relative_eq!(easing.apply(0.0), 0.0, epsilon = 1.0e-6);
            assert_relative_eq!(easing.apply(1.0), 1.0, epsilon = 1.0e-6);
            assert_relative_eq!(easing.apply(2.0), 1.0, epsilon = 1.0e-6);
        }
        assert_relative_eq!(Easing::QuadraticInOut.apply(0.5), 0.5);
    }

    #[test]
    fn yoyo_tween_peaks_halfway_and_returns() {
        let mut tween = Tween::new(1.0, 3.0, 2.0, Easing::Linear).with_yoyo(true);
        assert_relative_eq!(tween.advance(1.0), 3.0);
        assert_relative_eq!(tween.advance(0.5), 2.0);
        assert_relative_eq!(tween.advance(10.0), 1.0);
        assert!(tween.is_finished());
    }

    #[test]
    fn pulse_returns_to_the_resting_intensity() {
        let mut scene = Scene::new();
        let mut resources = ResourceManager::new();
        let g = resources.add_geometry(Geometry::new(procedural::icosphere(1.0, 0)));
        let m = resources.add_material(Material::standard(color::WHITE, 0.4));
        let node = scene.create_drawable(g, m);
        let id = scene.add(node);

        let mut pulses = EmissivePulses::new(1.0, 1.0);
        assert!(pulses.start(id, &scene, &resources));
        assert!(!pulses.start(id, &scene, &resources));

        pulses.update(0.5, &scene, &mut resources);
        let peak = resources.material(m).and_then(|m| m.emissive_intensity()).unwrap();
        assert_relative_eq!(peak, 1.4);

        pulses.update(0.6, &scene, &mut resources);
        let rest = resources.material(m).and_then(|m| m.emissive_intensity()).unwrap();
        assert_eq!(rest, 0.4);
        assert!(pulses.is_empty());
    }

    #[test]
    fn pulses_of_vanished_nodes_are_dropped() {
        let mut scene = Scene::new();
        let mut resources = ResourceManager::new();
        let g = resources.add_geometry(Geometry::new(procedural::icosphere(1.0, 0)));
        let m = resources.add_material(Material::standard(color::WHITE, 1.0));
        let node = scene.create_drawable(g, m);
        let id = scene.add(node);

        let mut pulses = EmissivePulses::default();
        assert!(pulses.start(id, &scene, &resources));
        let _ = scene.dispose(&mut resources);

        pulses.update(0.1, &scene, &mut resources);
        assert!(!pulses.is_active(id));
    }

    #[test]
    fn unlit_materials_do_not_pulse() {
        let mut scene = Scene::new();
        let mut resources = ResourceManager::new();
        let g = resources.add_geometry(Geometry::new(procedural::icosphere(1.0, 0)));
        let m = resources.add_material(Material::basic(color::WHITE));
        let node = scene.create_drawable(g, m);
        let id = scene.add(node);

        assert!(!EmissivePulses::default().start(id, &scene, &resources));
    }
}
