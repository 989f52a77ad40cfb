use tracing::trace;

use crate::game::{Carry, GameStateFlags, StateSnapshot};
use crate::offset::{
    Field, OffsetsCollection, PointerResolver, ResolveMode, ResolvedAddressTable, ValueKind,
};
use crate::process::{MemoryAccessor, ReadMemory};

/// Reads every tracked field once per tick
///
/// Read failures never stop sampling: the value degrades to 0 and the field is
/// listed in [`failed_fields`](StateSampler::failed_fields) until the next
/// sample.
pub struct StateSampler<R> {
    accessor: MemoryAccessor<R>,
    table: ResolvedAddressTable,
    failed: Vec<Field>,
}

impl<R: ReadMemory> StateSampler<R> {
    pub fn new(reader: R, table: ResolvedAddressTable) -> Self {
        Self {
            accessor: MemoryAccessor::new(reader),
            table,
            failed: Vec::new(),
        }
    }

    /// Resolve all chains against `reader` and sample from the result
    pub fn resolve(reader: R, offsets: &OffsetsCollection, mode: ResolveMode) -> Self {
        let table = PointerResolver::new(&reader, mode).resolve_all(offsets);
        Self::new(reader, table)
    }

    pub fn table(&self) -> &ResolvedAddressTable {
        &self.table
    }

    pub fn reader(&self) -> &R {
        self.accessor.reader()
    }

    /// Fields whose read failed during the last sample
    pub fn failed_fields(&self) -> &[Field] {
        &self.failed
    }

    /// Read a fresh snapshot; `carry` is copied through untouched
    pub fn sample(&mut self, carry: Carry) -> StateSnapshot {
        self.failed.clear();

        let snapshot = StateSnapshot {
            gamestate: GameStateFlags::from_bits_retain(self.read_uint(Field::GameState) as u32),
            loading_icon: self.read_uint(Field::LoadingIcon) as u16,
            fade_state: self.read_uint(Field::FadeState) as u32,
            fade_value: self.read_float(Field::FadeValue),
            game_flow: self.read_uint(Field::GameFlow) as u32,
            level_manager: self.read_uint(Field::LevelManager) as u32,
            mission: self.read_uint(Field::Mission) as u16,
            carry,
        };

        if !self.failed.is_empty() {
            trace!("Degraded reads: {:?}", self.failed);
        }

        snapshot
    }

    fn read_uint(&mut self, field: Field) -> u64 {
        let address = self.table.get(field);
        if address == 0 {
            self.failed.push(field);
            return 0;
        }

        let value = self.accessor.read_uint(address, field.kind().width());
        if self.accessor.last_failed() {
            self.failed.push(field);
        }
        value
    }

    fn read_float(&mut self, field: Field) -> f32 {
        debug_assert_eq!(field.kind(), ValueKind::Float32);

        let address = self.table.get(field);
        if address == 0 {
            self.failed.push(field);
            return 0.0;
        }

        let value = self.accessor.read_f32(address);
        if self.accessor.last_failed() {
            self.failed.push(field);
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{MockMemoryBuilder, MockMemoryReader};

    const GAMESTATE: u64 = 0x1000;
    const LOADING_ICON: u64 = 0x1010;
    const FADE_STATE: u64 = 0x1020;
    const FADE_VALUE: u64 = 0x1024;
    const GAME_FLOW: u64 = 0x1030;
    const LEVEL_MANAGER: u64 = 0x1040;
    const MISSION: u64 = 0x1050;

    fn table() -> ResolvedAddressTable {
        ResolvedAddressTable::from_addresses([
            GAMESTATE,
            LOADING_ICON,
            FADE_STATE,
            FADE_VALUE,
            GAME_FLOW,
            LEVEL_MANAGER,
            MISSION,
        ])
    }

    fn memory() -> MockMemoryReader {
        MockMemoryBuilder::new()
            .base(0x1000)
            .write_u32(0x00, 16 | 1024)
            .write_u32(0x10, 0xFFFF_0100) // only the low 2 bytes belong to the icon
            .write_u32(0x20, 2)
            .write_f32(0x24, 0.25)
            .write_u32(0x30, 4)
            .write_u32(0x40, 5)
            .write_u32(0x50, 0xAAAA_0007)
            .build()
    }

    #[test]
    fn test_sample_reads_each_field_at_its_width() {
        let mut sampler = StateSampler::new(memory(), table());
        let snapshot = sampler.sample(Carry::default());

        assert_eq!(
            snapshot.gamestate,
            GameStateFlags::CINEMATIC | GameStateFlags::MENU
        );
        assert_eq!(snapshot.loading_icon, 256);
        assert_eq!(snapshot.fade_state, 2);
        assert_eq!(snapshot.fade_value, 0.25);
        assert_eq!(snapshot.game_flow, 4);
        assert_eq!(snapshot.level_manager, 5);
        assert_eq!(snapshot.mission, 7);
        assert!(sampler.failed_fields().is_empty());
    }

    #[test]
    fn test_sample_copies_carry_unchanged() {
        let mut sampler = StateSampler::new(memory(), table());
        let carry = Carry {
            started: true,
            final_sequence_seen: true,
        };
        assert_eq!(sampler.sample(carry).carry, carry);
    }

    #[test]
    fn test_sample_degrades_unreadable_fields() {
        let mut addresses = [0u64; Field::COUNT];
        addresses[Field::GameFlow as usize] = GAME_FLOW;
        addresses[Field::Mission as usize] = 0xdead_0000;
        let mut sampler = StateSampler::new(memory(), ResolvedAddressTable::from_addresses(addresses));

        let snapshot = sampler.sample(Carry::default());

        assert_eq!(snapshot.game_flow, 4);
        assert_eq!(snapshot.mission, 0);
        assert_eq!(snapshot.fade_value, 0.0);
        assert_eq!(sampler.failed_fields().len(), Field::COUNT - 1);
        assert!(sampler.failed_fields().contains(&Field::Mission));
        assert!(!sampler.failed_fields().contains(&Field::GameFlow));
    }

    #[test]
    fn test_sample_sees_memory_changes() {
        let mut sampler = StateSampler::new(memory(), table());
        assert_eq!(sampler.sample(Carry::default()).mission, 7);

        sampler.reader().poke_u16(MISSION, 8);
        assert_eq!(sampler.sample(Carry::default()).mission, 8);
    }

    #[test]
    fn test_resolve_from_offsets() {
        let reader = MockMemoryBuilder::new()
            .base(0x2000)
            .write_u64(0, 0x1000)
            .base(0x1000)
            .write_u32(0x30, 6)
            .build();

        let mut offsets = OffsetsCollection::builtin();
        offsets.set_chain(Field::GameFlow, [0x2000, 0x30].into());

        let mut sampler = StateSampler::resolve(reader, &offsets, ResolveMode::Strict);
        assert_eq!(sampler.table().get(Field::GameFlow), 0x1030);
        assert_eq!(sampler.sample(Carry::default()).game_flow, 6);
    }
}
