//! winit → engine input conversion.

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use crate::input::{
    InputEvent, InputState, Key, KeyState, Modifiers, MouseButton, MouseButtonState,
    MouseWheelDelta, PointerButtonEvent, PointerMoveEvent,
};

impl From<ElementState> for KeyState {
    fn from(s: ElementState) -> Self {
        if s.is_pressed() { KeyState::Pressed } else { KeyState::Released }
    }
}

impl From<ElementState> for MouseButtonState {
    fn from(s: ElementState) -> Self {
        if s.is_pressed() { MouseButtonState::Pressed } else { MouseButtonState::Released }
    }
}

impl From<ModifiersState> for Modifiers {
    fn from(m: ModifiersState) -> Self {
        Modifiers {
            shift: m.shift_key(),
            ctrl: m.control_key(),
            alt: m.alt_key(),
            meta: m.super_key(),
        }
    }
}

impl From<WinitMouseButton> for MouseButton {
    fn from(b: WinitMouseButton) -> Self {
        match b {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            WinitMouseButton::Back => MouseButton::Other(3),
            WinitMouseButton::Forward => MouseButton::Other(4),
            WinitMouseButton::Other(v) => MouseButton::Other(v),
        }
    }
}

impl From<PhysicalKey> for Key {
    fn from(pk: PhysicalKey) -> Self {
        let PhysicalKey::Code(code) = pk else {
            // NativeKeyCode carries no stable numeric code.
            return Key::Unknown(0);
        };
        KEY_TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map(|&(_, key)| key)
            .unwrap_or(Key::Unknown(code as u32))
    }
}

const KEY_TABLE: &[(KeyCode, Key)] = &[
    (KeyCode::Escape, Key::Escape),
    (KeyCode::Space, Key::Space),
    (KeyCode::ArrowUp, Key::ArrowUp),
    (KeyCode::ArrowDown, Key::ArrowDown),
    (KeyCode::ArrowLeft, Key::ArrowLeft),
    (KeyCode::ArrowRight, Key::ArrowRight),
    (KeyCode::KeyA, Key::A),
    (KeyCode::KeyD, Key::D),
    (KeyCode::KeyR, Key::R),
    (KeyCode::KeyS, Key::S),
    (KeyCode::KeyW, Key::W),
];

/// Converts the input-carrying subset of `WindowEvent`. Positions are turned
/// into logical pixels with `scale_factor`.
pub(crate) fn input_event(
    event: &WindowEvent,
    state: &InputState,
    scale_factor: f64,
) -> Option<InputEvent> {
    let logical = |p: PhysicalPosition<f64>| {
        let l = p.to_logical::<f64>(scale_factor);
        (l.x as f32, l.y as f32)
    };

    let ev = match event {
        WindowEvent::ModifiersChanged(m) => InputEvent::ModifiersChanged(m.state().into()),
        WindowEvent::Focused(f) => InputEvent::Focused(*f),
        WindowEvent::CursorLeft { .. } => InputEvent::PointerLeft,

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = logical(*position);
            InputEvent::PointerMoved(PointerMoveEvent { x, y })
        }

        WindowEvent::MouseInput { state: st, button, .. } => {
            let (x, y) = state.pointer_pos.unwrap_or_default();
            InputEvent::PointerButton(PointerButtonEvent {
                button: (*button).into(),
                state: (*st).into(),
                x,
                y,
                modifiers: state.modifiers,
            })
        }

        WindowEvent::MouseWheel { delta, .. } => InputEvent::MouseWheel {
            delta: match *delta {
                MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x, y },
                MouseScrollDelta::PixelDelta(p) => {
                    let (x, y) = logical(p);
                    MouseWheelDelta::Pixel { x, y }
                }
            },
            modifiers: state.modifiers,
        },

        WindowEvent::KeyboardInput { event, .. } => InputEvent::Key {
            key: event.physical_key.into(),
            state: event.state.into(),
            modifiers: state.modifiers,
            repeat: event.repeat,
        },

        _ => return None,
    };
    Some(ev)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_map_through_the_table() {
        assert_eq!(Key::from(PhysicalKey::Code(KeyCode::KeyW)), Key::W);
        assert_eq!(Key::from(PhysicalKey::Code(KeyCode::ArrowLeft)), Key::ArrowLeft);
        assert_eq!(Key::from(PhysicalKey::Code(KeyCode::Escape)), Key::Escape);
    }

    #[test]
    fn unmapped_keys_keep_their_code() {
        let k = Key::from(PhysicalKey::Code(KeyCode::ShiftLeft));
        assert_eq!(k, Key::Unknown(KeyCode::ShiftLeft as u32));
    }

    #[test]
    fn element_state_converts() {
        assert_eq!(KeyState::from(ElementState::Pressed), KeyState::Pressed);
        assert_eq!(MouseButtonState::from(ElementState::Released), MouseButtonState::Released);
    }
}
