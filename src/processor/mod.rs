//! Main packet processing logic

use std::collections::BTreeSet;
use std::io::Write;

use log::{debug, info};

use crate::caption::parse_caption_pes;
use crate::caption::text::CaptionTextDecoder;
use crate::clock::ClockTracker;
use crate::constants::*;
use crate::dialogue::DialogueEmitter;
use crate::error::Result;
use crate::events::{CaptionReconstructor, DialogueInterval, Trailing};
use crate::packet::parse_packet;
use crate::psi::{parse_pat, parse_pmt, parse_tot};
use crate::report::ExtractionReport;
use crate::types::ProcessorConfig;

/// All cross-packet state of one extraction run.
pub struct PacketProcessor<W: Write> {
    config:      ProcessorConfig,
    pmt_pids:    BTreeSet<u16>,
    caption_pid: Option<u16>,
    pcr_pid:     Option<u16>,
    clock:       ClockTracker,
    captions:    CaptionReconstructor,
    decoder:     Box<dyn CaptionTextDecoder>,
    emitter:     DialogueEmitter<W>,
    packets:     u64,
    /// set when `finish` had to discard text that was still on screen
    dropped:     bool,
}

impl<W: Write> PacketProcessor<W> {
    pub fn new(out: W, decoder: Box<dyn CaptionTextDecoder>, config: ProcessorConfig) -> Self {
        Self {
            config,
            pmt_pids:    BTreeSet::new(),
            caption_pid: None,
            pcr_pid:     None,
            clock:       ClockTracker::new(),
            captions:    CaptionReconstructor::new(),
            decoder,
            emitter:     DialogueEmitter::new(out),
            packets:     0,
            dropped:     false,
        }
    }

    pub fn pmt_pids(&self) -> &BTreeSet<u16> {
        &self.pmt_pids
    }

    pub fn caption_pid(&self) -> Option<u16> {
        self.caption_pid
    }

    pub fn pcr_pid(&self) -> Option<u16> {
        self.pcr_pid
    }

    pub fn clock(&self) -> &ClockTracker {
        &self.clock
    }

    /// Process a single TS packet
    pub fn process_packet(&mut self, chunk: &[u8]) -> Result<()> {
        let pkt = parse_packet(chunk)?;
        self.packets += 1;

        let pid = pkt.header.pid;
        let payload_unit_start = pkt.header.payload_unit_start;

        if let Some(pcr) = pkt.pcr {
            if self.pcr_pid == Some(pid) {
                self.clock.observe_pcr(pcr);
            }
        }

        let Some(payload) = pkt.payload else { return Ok(()) };
        if !payload_unit_start {
            // sections and caption PES are only read from their first packet
            return Ok(());
        }

        if pid == PAT_PID {
            self.process_pat(payload);
        } else if self.pmt_pids.contains(&pid) {
            if self.caption_pid.is_none() {
                self.process_pmt(payload);
            }
        } else if pid == TOT_PID {
            self.process_tot(payload);
        } else if self.caption_pid == Some(pid) {
            self.process_caption(payload)?;
        }
        Ok(())
    }

    fn process_pat(&mut self, payload: &[u8]) {
        if !self.pmt_pids.is_empty() {
            return;
        }
        let Some(pat) = parse_pat(payload, self.config.verify_crc) else { return };
        let pids = pat.pmt_pids();
        if pids.is_empty() {
            return;
        }
        info!("found {} program map pids: {:04X?}", pids.len(), pids);
        self.pmt_pids = pids;
    }

    fn process_pmt(&mut self, payload: &[u8]) {
        let Some(pmt) = parse_pmt(payload, self.config.verify_crc) else { return };
        match pmt.caption_pid() {
            Some(caption_pid) => {
                info!(
                    "caption pid = 0x{:04X}, PCR_PID = 0x{:04X} (program {})",
                    caption_pid, pmt.pcr_pid, pmt.program_number
                );
                self.caption_pid = Some(caption_pid);
                self.pcr_pid = Some(pmt.pcr_pid);
            }
            None => debug!("program {} has no caption stream", pmt.program_number),
        }
    }

    fn process_tot(&mut self, payload: &[u8]) {
        if let Some(wall) = parse_tot(payload, self.config.verify_crc) {
            self.clock.observe_wall_time(wall);
        }
    }

    fn process_caption(&mut self, payload: &[u8]) -> Result<()> {
        let Some(group) = parse_caption_pes(payload) else { return Ok(()) };
        let at = self.clock.current();
        for unit in group.statements() {
            let text = self.decoder.decode(unit.data);
            if let Some(interval) = self.captions.push(text, at) {
                self.write_interval(&interval)?;
            }
        }
        Ok(())
    }

    fn write_interval(&mut self, interval: &DialogueInterval) -> Result<()> {
        let start = self.clock.render(interval.start);
        let end = self.clock.render(interval.end);
        self.emitter.emit(start, end, &interval.text)
    }

    pub fn report(&self) -> ExtractionReport {
        ExtractionReport {
            packets:                self.packets,
            pmt_pids:               self.pmt_pids.iter().copied().collect(),
            caption_pid:            self.caption_pid,
            pcr_pid:                self.pcr_pid,
            clock_offset_centitime: self.clock.is_synced().then(|| self.clock.offset()),
            dialogue_lines:         self.emitter.lines(),
            trailing_dropped:       self.dropped || self.captions.pending().is_some_and(|p| !p.is_blank),
        }
    }

    /// Ends the run. The last caption is only written with `flush_trailing`.
    pub fn finish(mut self) -> Result<(ExtractionReport, W)> {
        if self.config.flush_trailing {
            let end = self.clock.current();
            match self.captions.finish(end) {
                Trailing::Closed(interval) => self.write_interval(&interval)?,
                Trailing::Dropped(last) => {
                    debug!("dropping trailing caption {:?}: no clock after its start", last.text);
                    self.dropped = true;
                }
                Trailing::Empty => {}
            }
        } else if let Some(last) = self.captions.pending() {
            debug!("dropping trailing caption {:?}: end time unknown", last.text);
        }
        self.emitter.flush()?;
        let report = self.report();
        Ok((report, self.emitter.into_inner()))
    }
}
