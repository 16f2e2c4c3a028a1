use bitflags::bitflags;
use crossbeam_channel::{unbounded, Receiver, Sender};
use glam::{Vec2, Vec3};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use crate::world::BlockType;

bitflags! {
    /// Movement requested for the current tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct MovementIntent: u8 {
        const FORWARD = 1 << 0;
        const BACK = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const JUMP = 1 << 4;
    }
}

impl MovementIntent {
    /// Unit direction in local space (forward is -Z), or zero when the intents cancel out.
    pub fn planar_direction(self) -> Vec3 {
        let mut direction = Vec3::ZERO;
        if self.contains(Self::FORWARD) {
            direction.z -= 1.0;
        }
        if self.contains(Self::BACK) {
            direction.z += 1.0;
        }
        if self.contains(Self::LEFT) {
            direction.x -= 1.0;
        }
        if self.contains(Self::RIGHT) {
            direction.x += 1.0;
        }
        direction.normalize_or_zero()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    Escape,
    Other(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other(u8),
}

impl From<u8> for PointerButton {
    fn from(index: u8) -> Self {
        match index {
            0 => PointerButton::Primary,
            2 => PointerButton::Secondary,
            other => PointerButton::Other(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerMove { dx: f32, dy: f32 },
    PointerButton(PointerButton),
    /// The input device gained or lost exclusive pointer capture.
    PointerCapture(bool),
    SelectBlock(BlockType),
}

/// Latched input, fed from device events and read once per frame by the simulation.
#[derive(Debug, Default)]
pub struct InputState {
    active_keys: HashSet<Key>,
    pointer_delta: Vec2,
    clicks: VecDeque<PointerButton>,
    captured: bool,
    selection: Option<BlockType>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one device event. Block selection and pointer capture always
    /// apply; everything else is dropped while no session runs.
    pub fn handle_event(&mut self, event: InputEvent, running: bool) {
        match event {
            InputEvent::SelectBlock(block_type) => {
                self.selection = Some(block_type);
                return;
            }
            InputEvent::PointerCapture(captured) => {
                self.captured = captured;
                return;
            }
            _ => {}
        }
        if !running {
            return;
        }

        match event {
            InputEvent::KeyDown(key) => {
                if self.active_keys.insert(key) {
                    debug!("Key pressed: {:?}", key);
                }
            }
            InputEvent::KeyUp(key) => {
                self.active_keys.remove(&key);
            }
            InputEvent::PointerMove { dx, dy } => {
                if self.captured {
                    self.pointer_delta += Vec2::new(dx, dy);
                }
            }
            InputEvent::PointerButton(button) => self.clicks.push_back(button),
            InputEvent::PointerCapture(_) | InputEvent::SelectBlock(_) => {}
        }
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.active_keys.contains(&key)
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    pub fn intent(&self) -> MovementIntent {
        let mut intent = MovementIntent::empty();
        for (key, flag) in [
            (Key::W, MovementIntent::FORWARD),
            (Key::S, MovementIntent::BACK),
            (Key::A, MovementIntent::LEFT),
            (Key::D, MovementIntent::RIGHT),
            (Key::Space, MovementIntent::JUMP),
        ] {
            intent.set(flag, self.is_pressed(key));
        }
        intent
    }

    /// Pointer motion accumulated since the last call.
    pub fn take_pointer_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.pointer_delta)
    }

    pub fn take_clicks(&mut self) -> Vec<PointerButton> {
        self.clicks.drain(..).collect()
    }

    pub fn take_selection(&mut self) -> Option<BlockType> {
        self.selection.take()
    }

    /// Releases every latch; pointer capture belongs to the device and is left alone.
    pub fn clear(&mut self) {
        self.active_keys.clear();
        self.pointer_delta = Vec2::ZERO;
        self.clicks.clear();
    }
}

/// Producer side of the input queue; cheap to clone into device callbacks.
#[derive(Debug, Clone)]
pub struct InputSender(Sender<InputEvent>);

impl InputSender {
    pub fn send(&self, event: InputEvent) {
        if self.0.send(event).is_err() {
            warn!("Input queue closed, dropping {:?}", event);
        }
    }
}

pub fn input_queue() -> (InputSender, Receiver<InputEvent>) {
    let (tx, rx) = unbounded();
    (InputSender(tx), rx)
}
