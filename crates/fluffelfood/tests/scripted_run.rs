//! A whole run against synthetic game memory and a real timer socket.

use std::io::Read;
use std::os::unix::net::UnixListener;
use std::thread;

use fluffelfood::offset::{Field, OffsetsCollection, PointerChain, ResolveMode};
use fluffelfood::process::{MockMemoryBuilder, MockMemoryReader};
use fluffelfood::protocol::MESSAGE_SIZE;
use fluffelfood::{
    Autosplitter, AutosplitterConfig, Control, RunLog, StateSampler, TickOutcome, TimerClient,
    TimerMessage,
};

// Heap block the pointer chains lead into
const BLOCK: u64 = 0x7f00_0000_1000;

const GAMESTATE: u64 = BLOCK;
const LOADING_ICON: u64 = BLOCK + 0x1c;
const FADE_STATE: u64 = 0x415df88;
const FADE_VALUE: u64 = 0x415df8c;
const GAME_FLOW: u64 = BLOCK + 0x40;
const LEVEL_MANAGER: u64 = BLOCK + 0x44;
const MISSION: u64 = BLOCK + 0x48;

fn offsets() -> OffsetsCollection {
    let mut offsets = OffsetsCollection::builtin();
    offsets.set_chain(Field::GameState, PointerChain::from([0x4000000, 0]));
    offsets.set_chain(Field::LoadingIcon, PointerChain::from([0x4000000, 0x1c]));
    offsets.set_chain(Field::FadeState, PointerChain::fixed(FADE_STATE as i64));
    offsets.set_chain(Field::FadeValue, PointerChain::fixed(FADE_VALUE as i64));
    offsets.set_chain(Field::GameFlow, PointerChain::from([0x4000008, 0x40]));
    offsets.set_chain(Field::LevelManager, PointerChain::from([0x4000008, 0x44]));
    offsets.set_chain(Field::Mission, PointerChain::from([0x4000010, 0x20, 0x48]));
    offsets
}

fn memory() -> MockMemoryReader {
    MockMemoryBuilder::new()
        .base(0x4000000)
        .with_size(0x20)
        .write_u64(0x00, BLOCK)
        .write_u64(0x08, BLOCK)
        .write_u64(0x10, 0x5000_0000)
        .base(0x5000_0000)
        .with_size(0x40)
        .write_u64(0x20, BLOCK)
        .base(0x415df80)
        .with_size(0x10)
        .base(BLOCK)
        .with_size(0x100)
        .build()
}

/// Game memory for one tick
struct Frame {
    gamestate: u32,
    loading_icon: u16,
    fade_state: u32,
    fade_value: f32,
    game_flow: u32,
    level_manager: u32,
    mission: u16,
}

impl Frame {
    fn in_game(mission: u16) -> Self {
        Self {
            gamestate: 0,
            loading_icon: 0,
            fade_state: 0,
            fade_value: 1.0,
            game_flow: 4,
            level_manager: 5,
            mission,
        }
    }

    fn fading(mission: u16, value: f32) -> Self {
        Self {
            fade_state: 2,
            fade_value: value,
            ..Self::in_game(mission)
        }
    }

    fn poke(&self, memory: &MockMemoryReader) {
        memory.poke_u32(GAMESTATE, self.gamestate);
        memory.poke_u16(LOADING_ICON, self.loading_icon);
        memory.poke_u32(FADE_STATE, self.fade_state);
        memory.poke_f32(FADE_VALUE, self.fade_value);
        memory.poke_u32(GAME_FLOW, self.game_flow);
        memory.poke_u32(LEVEL_MANAGER, self.level_manager);
        memory.poke_u16(MISSION, self.mission);
    }
}

fn script() -> Vec<Frame> {
    vec![
        // Intro cinematic of mission 1
        Frame {
            gamestate: 16,
            ..Frame::fading(1, 0.0)
        },
        Frame::fading(1, 0.0),
        // Fade-in starts the run
        Frame::fading(1, 0.25),
        Frame::fading(1, 1.0),
        // Level change
        Frame {
            level_manager: 7,
            ..Frame::in_game(1)
        },
        Frame {
            level_manager: 7,
            loading_icon: 256,
            ..Frame::in_game(2)
        },
        Frame::fading(2, 0.05),
        Frame::fading(2, 0.4),
        // Final mission, blackout before the fade-in must not stop the run
        Frame {
            fade_state: 1,
            ..Frame::in_game(19)
        },
        Frame::fading(19, 0.3),
        Frame::fading(19, 0.7),
        Frame {
            fade_state: 1,
            ..Frame::in_game(19)
        },
        // Never reached
        Frame::in_game(1),
    ]
}

#[test]
fn test_scripted_run_over_socket() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("fluffelwatch");
    let log_path = dir.path().join("run.log");
    let listener = UnixListener::bind(&socket).unwrap();

    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut received = Vec::new();
        stream.read_to_end(&mut received).unwrap();
        received
    });

    let config = AutosplitterConfig::builder()
        .socket_path(&socket)
        .run_log_path(&log_path)
        .build();
    let mut client = TimerClient::connect(&config.socket_path).unwrap();
    let mut sampler = StateSampler::resolve(memory(), &offsets(), ResolveMode::Strict);
    assert!(sampler.table().is_complete(), "{:?}", sampler.table().unresolved());

    let run_log = RunLog::create(config.run_log_path.as_ref().unwrap()).unwrap();
    let mut autosplitter = Autosplitter::new(config).with_run_log(run_log);

    let mut outcomes = Vec::new();
    for frame in script() {
        frame.poke(sampler.reader());
        let outcome = autosplitter.tick(&mut sampler, &mut client).unwrap();
        outcomes.push(outcome);
        if matches!(outcome, TickOutcome::Finished(_)) {
            break;
        }
    }
    client.disconnect();

    assert!(autosplitter.is_finished());
    assert_eq!(outcomes.len(), script().len() - 1);
    assert!(sampler.failed_fields().is_empty());

    let received = server.join().unwrap();
    assert_eq!(received.len() % MESSAGE_SIZE, 0);
    let messages: Vec<TimerMessage> = received
        .chunks(MESSAGE_SIZE)
        .map(|c| TimerMessage::decode(c).unwrap())
        .collect();

    let controls: Vec<Control> = messages.iter().map(|m| m.control).collect();
    assert_eq!(
        controls,
        [
            Control::None,
            Control::None,
            Control::Start,
            Control::None,
            Control::Pause,
            Control::Pause,
            Control::Pause,
            Control::None,
            Control::None,
            Control::None,
            Control::None,
            Control::Stop,
        ]
    );

    let sections: Vec<u32> = messages.iter().map(|m| m.section).collect();
    assert_eq!(sections, [1, 1, 1, 1, 1, 2, 2, 2, 19, 19, 19, 19]);

    // Logo and cinematic, then logo only, then logo and loading
    assert_eq!(messages[0].icon_mask, 0x401);
    assert_eq!(messages[1].icon_mask, 0x01);
    assert_eq!(messages[5].icon_mask, 0x41);

    let log = std::fs::read_to_string(&log_path).unwrap();
    let labels: Vec<&str> = log
        .lines()
        .map(|l| l.rsplit('\t').next().unwrap())
        .collect();
    assert_eq!(
        labels,
        [
            "Start!",
            "Loading!",
            "Split mission",
            "Stopped loading!",
            "Split mission",
            "Final mission!",
            "Final stop!"
        ]
    );
}
