//! Fire-and-forget audio cues.
//!
//! The engine names cues; an external synth renders them. Cue delivery must
//! never interrupt the frame handler, so the OSC sink swallows send errors.

use anyhow::Result;
use rosc::{encoder, OscMessage, OscPacket, OscType};
use std::net::UdpSocket;

/// Default cue synth address.
pub const CUE_DEFAULT_ADDR: &str = "127.0.0.1:57130";

/// Named UI cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Select,
    Hover,
    Engage,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Select => "select",
            Cue::Hover => "hover",
            Cue::Engage => "engage",
        }
    }
}

/// Cue consumer. Implementations must not fail back into the caller.
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Discards all cues.
#[derive(Debug, Default)]
pub struct NullCues;

impl CueSink for NullCues {
    fn play(&mut self, _cue: Cue) {}
}

/// Records cues in order; used by tests and the demo's dry-run mode.
#[derive(Debug, Default)]
pub struct MemoryCues {
    pub played: Vec<Cue>,
}

impl CueSink for MemoryCues {
    fn play(&mut self, cue: Cue) {
        self.played.push(cue);
    }
}

/// Build the OSC message for one cue.
pub fn build_cue_message(cue: Cue) -> OscMessage {
    OscMessage {
        addr: "/handwave/cue".to_string(),
        args: vec![OscType::String(cue.as_str().to_string())],
    }
}

/// Encode a cue message to bytes.
pub fn encode_cue_message(msg: &OscMessage) -> Result<Vec<u8>> {
    let packet = OscPacket::Message(msg.clone());
    let encoded = encoder::encode(&packet)?;
    Ok(encoded)
}

/// Sends cues as OSC over UDP to an external synthesizer.
pub struct OscCuePlayer {
    socket: UdpSocket,
    target_addr: String,
}

impl OscCuePlayer {
    pub fn new(target_addr: &str) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        Ok(Self {
            socket,
            target_addr: target_addr.to_string(),
        })
    }

    fn send(&self, cue: Cue) -> Result<()> {
        let msg = build_cue_message(cue);
        let data = encode_cue_message(&msg)?;
        self.socket.send_to(&data, &self.target_addr)?;
        Ok(())
    }
}

impl CueSink for OscCuePlayer {
    fn play(&mut self, cue: Cue) {
        // Fire-and-forget: a lost cue is not worth interrupting a frame.
        let _ = self.send(cue);
    }
}
