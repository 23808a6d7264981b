//! Window events and how they drive the application.

use crate::app::AppContext;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent as WinitWindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Mouse buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

/// Keys the viewer reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Quits.
    Escape,
    /// Regenerates the field.
    R,
    /// Toggles the bloom.
    B,
    /// Toggles the camera auto-rotation.
    Space,
    Other,
}

/// An event coming from the window system.
///
/// Positions are in logical pixels, sizes in physical pixels. A resize
/// carries the scale factor in effect when it was emitted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowEvent {
    /// The user asked to close the window.
    Close,
    /// The drawable area changed size.
    Resized {
        width: u32,
        height: u32,
        scale_factor: f64,
    },
    /// The device pixel ratio changed.
    ScaleFactorChanged(f64),
    /// The pointer moved.
    CursorMoved { x: f64, y: f64 },
    /// The pointer left the window.
    CursorLeft,
    /// A mouse button was pressed or released.
    MouseButton { button: MouseButton, pressed: bool },
    /// The wheel turned; positive is away from the user.
    Scroll(f32),
    /// A key was pressed or released.
    Key { key: Key, pressed: bool },
}

/// Converts a winit event, given the current scale factor.
pub(crate) fn translate(event: &WinitWindowEvent, scale_factor: f64) -> Option<WindowEvent> {
    let event = match event {
        WinitWindowEvent::CloseRequested => WindowEvent::Close,
        WinitWindowEvent::Resized(size) => {
            if size.width == 0 || size.height == 0 {
                return None;
            }
            WindowEvent::Resized {
                width: size.width,
                height: size.height,
                scale_factor,
            }
        }
        WinitWindowEvent::ScaleFactorChanged { scale_factor, .. } => {
            WindowEvent::ScaleFactorChanged(*scale_factor)
        }
        WinitWindowEvent::CursorMoved { position, .. } => WindowEvent::CursorMoved {
            x: position.x / scale_factor,
            y: position.y / scale_factor,
        },
        WinitWindowEvent::CursorLeft { .. } => WindowEvent::CursorLeft,
        WinitWindowEvent::MouseInput { state, button, .. } => WindowEvent::MouseButton {
            button: match button {
                winit::event::MouseButton::Left => MouseButton::Left,
                winit::event::MouseButton::Right => MouseButton::Right,
                winit::event::MouseButton::Middle => MouseButton::Middle,
                _ => MouseButton::Other,
            },
            pressed: *state == ElementState::Pressed,
        },
        WinitWindowEvent::MouseWheel { delta, .. } => WindowEvent::Scroll(match delta {
            MouseScrollDelta::LineDelta(_, dy) => *dy,
            MouseScrollDelta::PixelDelta(d) => (d.y / 40.0) as f32,
        }),
        WinitWindowEvent::KeyboardInput { event, .. } => WindowEvent::Key {
            key: match event.physical_key {
                PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
                PhysicalKey::Code(KeyCode::KeyR) => Key::R,
                PhysicalKey::Code(KeyCode::KeyB) => Key::B,
                PhysicalKey::Code(KeyCode::Space) => Key::Space,
                _ => Key::Other,
            },
            pressed: event.state == ElementState::Pressed,
        },
        _ => return None,
    };

    Some(event)
}

/// Applies an event to the application.
///
/// Resize events carry physical sizes, converted to logical ones with their
/// own scale factor.
pub fn apply(app: &mut AppContext, event: &WindowEvent) {
    match *event {
        WindowEvent::Close => app.stop(),
        WindowEvent::Resized {
            width,
            height,
            scale_factor,
        } => {
            let width = (width as f64 / scale_factor).round() as u32;
            let height = (height as f64 / scale_factor).round() as u32;
            let _ = app.resize(width, height, scale_factor);
        }
        WindowEvent::ScaleFactorChanged(scale) => {
            let surface = app.surface();
            let _ = app.resize(surface.width, surface.height, scale);
        }
        WindowEvent::CursorMoved { x, y } => app.pointer_move(x, y),
        WindowEvent::CursorLeft => {
            app.pointer_up();
            app.clear_cursor();
        }
        WindowEvent::MouseButton {
            button: MouseButton::Left,
            pressed,
        } => {
            if pressed {
                app.pointer_down();
            } else {
                app.pointer_up();
            }
        }
        WindowEvent::MouseButton { .. } => {}
        WindowEvent::Scroll(delta) => app.scroll(delta),
        WindowEvent::Key {
            key,
            pressed: true,
        } => match key {
            Key::Escape => app.stop(),
            Key::R => app.regenerate(),
            Key::B => {
                let mut bloom = app.config().bloom;
                bloom.enabled = !bloom.enabled;
                log::info!("bloom {}", if bloom.enabled { "on" } else { "off" });
                app.set_bloom(bloom);
            }
            Key::Space => {
                let controls = app.controls_mut();
                controls.auto_rotate = !controls.auto_rotate;
            }
            Key::Other => {}
        },
        WindowEvent::Key { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SurfaceSize;
    use crate::config::{SceneParams, ViewerConfig};
    use glamx::Vec2;

    fn app() -> AppContext {
        let config = ViewerConfig {
            seed: Some(2),
            scene: SceneParams {
                count: 5,
                detail: 0,
                ..SceneParams::default()
            },
            ..ViewerConfig::default()
        };
        AppContext::new(Some(SurfaceSize::new(100, 100)), config).unwrap()
    }

    #[test]
    fn close_and_escape_stop_the_loop() {
        let mut a = app();
        apply(&mut a, &WindowEvent::Close);
        assert!(!a.is_running());

        let mut b = app();
        apply(&mut b, &WindowEvent::Key { key: Key::Escape, pressed: false });
        assert!(b.is_running());
        apply(&mut b, &WindowEvent::Key { key: Key::Escape, pressed: true });
        assert!(!b.is_running());
    }

    #[test]
    fn physical_resizes_become_logical() {
        let mut a = app();
        apply(
            &mut a,
            &WindowEvent::Resized {
                width: 400,
                height: 200,
                scale_factor: 2.0,
            },
        );

        let surface = a.surface();
        assert_eq!((surface.width, surface.height), (200, 100));
        assert_eq!(a.compositor().size(), (400, 200));
    }

    #[test]
    fn cursor_events_feed_hit_testing() {
        let mut a = app();
        apply(&mut a, &WindowEvent::CursorMoved { x: 50.0, y: 50.0 });
        assert_eq!(a.cursor(), Some(Vec2::ZERO));

        apply(&mut a, &WindowEvent::CursorLeft);
        assert_eq!(a.cursor(), None);
    }

    #[test]
    fn b_toggles_the_bloom() {
        let mut a = app();
        let key = WindowEvent::Key { key: Key::B, pressed: true };

        apply(&mut a, &key);
        assert!(!a.compositor().bloom().enabled);
        apply(&mut a, &key);
        assert!(a.compositor().bloom().enabled);
    }

    #[test]
    fn r_regenerates_the_field() {
        let mut a = app();
        let before = a.field().map(|f| f.nodes.clone());

        apply(&mut a, &WindowEvent::Key { key: Key::R, pressed: true });

        assert_ne!(a.field().map(|f| f.nodes.clone()), before);
        assert_eq!(a.resources().live_geometries(), 1);
    }

    #[test]
    fn resizes_keep_the_scale_factor_they_were_emitted_with() {
        let physical = winit::dpi::PhysicalSize::new(800, 600);
        let event = translate(&WinitWindowEvent::Resized(physical), 2.0);
        assert_eq!(
            event,
            Some(WindowEvent::Resized {
                width: 800,
                height: 600,
                scale_factor: 2.0,
            })
        );

        // A later scale change in the same batch does not reinterpret it.
        let mut a = app();
        if let Some(event) = event {
            apply(&mut a, &event);
        }
        apply(&mut a, &WindowEvent::ScaleFactorChanged(1.0));

        let surface = a.surface();
        assert_eq!((surface.width, surface.height), (400, 300));
        assert_eq!(surface.device_pixel_ratio, 1.0);
        assert_eq!(a.compositor().size(), (400, 300));
    }
}
