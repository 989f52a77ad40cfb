//! Print the resolved address of every tracked field.

use anyhow::Result;
use fluffelfood::display::address_lines;
use fluffelfood::offset::Field;
use fluffelfood::{MemoryReader, PointerResolver};

use super::{attach, offsets_for, resolve_mode};
use crate::TargetArgs;

pub fn run(target: &TargetArgs) -> Result<()> {
    let offsets = offsets_for(target)?;
    let process = attach(target.pid, &target.binary)?;
    let reader = MemoryReader::new(&process);
    let resolver = PointerResolver::new(&reader, resolve_mode(target));

    println!("Offsets {} ({:?} resolution)", offsets.version, resolver.mode());
    println!();

    let table = resolver.resolve_all(&offsets);
    for line in address_lines(&table) {
        println!("{}", line);
    }

    for field in table.unresolved() {
        if let Err(brk) = resolver.resolve(offsets.chain(*field)) {
            println!();
            println!("{}", brk.into_error(*field));
            println!("  chain: {}", offsets.chain(*field));
        }
    }

    let resolved = Field::COUNT - table.unresolved().len();
    println!();
    println!("{}/{} fields resolved", resolved, Field::COUNT);
    Ok(())
}
