//! Value Change Dump of a recorded MAC run.

use std::fs::File;
use std::io::{BufWriter, Write};

use camino::Utf8Path;
use eyre::{Result, WrapErr};
use log::info;

use crate::simulator::CycleRecord;
use crate::value::Numeric;

/// Half a clock period, in VCD time units.
const HALF_PERIOD: u64 = 5;

const CLK: &str = "!";
const X: &str = "\"";
const Y: &str = "#";
const ACC: &str = "$";

fn binary(value: i64, width: u32) -> String {
    let mask = if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    };
    format!("b{:0width$b}", value as u64 & mask, width = width as usize)
}

/// Writes `records` as a VCD with one clock period per cycle. Operands change
/// on the falling edge, the accumulator on the rising edge.
pub fn write_vcd<W: Write, V: Numeric>(mut out: W, records: &[CycleRecord<V>]) -> Result<()> {
    let width = V::BITS;
    writeln!(out, "$timescale 1ns $end")?;
    writeln!(out, "$scope module mac $end")?;
    writeln!(out, "$var wire 1 {CLK} clk $end")?;
    writeln!(out, "$var wire {width} {X} x $end")?;
    writeln!(out, "$var wire {width} {Y} y $end")?;
    writeln!(out, "$var reg {width} {ACC} acc $end")?;
    writeln!(out, "$upscope $end")?;
    writeln!(out, "$enddefinitions $end")?;

    for record in records {
        let start = record.cycle * 2 * HALF_PERIOD;
        writeln!(out, "#{start}")?;
        writeln!(out, "0{CLK}")?;
        writeln!(out, "{} {X}", binary(record.x.to_i64(), width))?;
        writeln!(out, "{} {Y}", binary(record.y.to_i64(), width))?;
        writeln!(out, "{} {ACC}", binary(record.output.to_i64(), width))?;
        writeln!(out, "#{}", start + HALF_PERIOD)?;
        writeln!(out, "1{CLK}")?;
        writeln!(out, "{} {ACC}", binary(record.next.to_i64(), width))?;
    }

    if let Some(last) = records.last() {
        writeln!(out, "#{}", (last.cycle + 1) * 2 * HALF_PERIOD)?;
    }
    out.flush()?;
    Ok(())
}

/// Writes `records` to a `.vcd` file at `path`.
pub fn dump_vcd<V: Numeric>(path: &Utf8Path, records: &[CycleRecord<V>]) -> Result<()> {
    let file = File::create(path).wrap_err_with(|| format!("Failed to create {path}"))?;
    write_vcd(BufWriter::new(file), records).wrap_err_with(|| format!("Failed to write {path}"))?;
    info!("Wrote {} cycles to {}", records.len(), path);
    Ok(())
}
