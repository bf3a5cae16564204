//! Tests of the pattern driver against a recording output pin.
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use blinker::config::MIN_INTERVAL;
use blinker::pattern::PatternDriver;
use blinker::{OutputPattern, WriteErrorPolicy};
use embedded_hal::digital::{ErrorKind, PinState};

mod common;
use common::{RecordingOutput, bits};

const BLINK: Duration = Duration::from_millis(40);

fn blink() -> OutputPattern {
    OutputPattern::Blink { interval: BLINK }
}

/// Feed `events` to a driver and close the channel.
fn drive(pattern: OutputPattern, events: &[u8]) -> Result<Vec<u8>, ErrorKind> {
    let (output, log) = RecordingOutput::new();
    let (tx, rx) = mpsc::sync_channel(events.len());
    for &event in events {
        tx.send(PinState::from(event != 0)).unwrap();
    }
    drop(tx);
    PatternDriver::new(output, pattern, WriteErrorPolicy::Abort).run(rx)?;
    Ok(bits(&log.levels()))
}

#[test]
fn repeated_low_while_idle_does_not_write() -> Result<(), ErrorKind> {
    // Initial forced low, then the final low on exit.
    assert_eq!(drive(blink(), &[0, 0, 0, 0, 0])?, [0, 0]);
    Ok(())
}

#[test]
fn edge_events_each_write_once() -> Result<(), ErrorKind> {
    assert_eq!(drive(OutputPattern::Steady, &[1, 0, 1])?, [0, 1, 0, 1, 0]);
    Ok(())
}

#[test]
fn repeated_high_is_ignored() -> Result<(), ErrorKind> {
    assert_eq!(drive(OutputPattern::Steady, &[1, 1, 1, 0])?, [0, 1, 0, 0]);
    Ok(())
}

#[test]
fn last_write_is_low_when_closed_while_active() -> Result<(), ErrorKind> {
    let levels = drive(blink(), &[1])?;
    assert_eq!(levels.first(), Some(&0));
    assert_eq!(levels.last(), Some(&0));
    assert!(levels.contains(&1));
    Ok(())
}

#[test]
fn blinks_without_new_events_no_faster_than_interval() -> Result<(), ErrorKind> {
    let (output, log) = RecordingOutput::new();
    let (tx, rx) = mpsc::sync_channel(1);
    let driver = thread::spawn(move || PatternDriver::new(output, blink(), WriteErrorPolicy::Abort).run(rx));

    tx.send(PinState::High).unwrap();
    thread::sleep(BLINK * 5 + BLINK / 2);
    tx.send(PinState::Low).unwrap();
    thread::sleep(BLINK * 2);
    drop(tx);
    driver.join().unwrap()?;

    let writes = log.writes();
    let levels = bits(&log.levels());
    // Initial low, high on activation, at least three toggles, low on
    // release and the final low on exit.
    assert!(levels.len() >= 7, "{levels:?}");
    assert_eq!(&levels[..2], [0, 1]);
    assert_eq!(levels.last(), Some(&0));

    // Alternating levels while blinking, spaced at least one interval apart.
    let blinking = &writes[1..writes.len() - 2];
    for pair in blinking.windows(2) {
        assert_ne!(pair[0].level, pair[1].level);
        assert!(pair[1].at.duration_since(pair[0].at) >= BLINK);
    }
    Ok(())
}

#[test]
fn zero_blink_interval_toggles_at_the_minimum_interval() -> Result<(), ErrorKind> {
    let (output, log) = RecordingOutput::new();
    let (tx, rx) = mpsc::sync_channel(1);
    let pattern = OutputPattern::Blink {
        interval: Duration::ZERO,
    };
    let driver = thread::spawn(move || PatternDriver::new(output, pattern, WriteErrorPolicy::Abort).run(rx));

    tx.send(PinState::High).unwrap();
    thread::sleep(Duration::from_millis(30));
    drop(tx);
    driver.join().unwrap()?;

    let writes = log.writes();
    assert!(writes.len() >= 4, "{}", writes.len());
    // Initial low, then blinking until the final low.
    for pair in writes[1..writes.len() - 1].windows(2) {
        assert!(pair[1].at.duration_since(pair[0].at) >= MIN_INTERVAL);
    }
    Ok(())
}

#[test]
fn idle_does_not_toggle() -> Result<(), ErrorKind> {
    let (output, log) = RecordingOutput::new();
    let (tx, rx) = mpsc::sync_channel(1);
    let driver = thread::spawn(move || PatternDriver::new(output, blink(), WriteErrorPolicy::Abort).run(rx));

    thread::sleep(BLINK * 3);
    drop(tx);
    driver.join().unwrap()?;
    assert_eq!(bits(&log.levels()), [0, 0]);
    Ok(())
}

#[test]
fn write_failure_aborts_and_still_switches_off() {
    let (output, log) = RecordingOutput::new();
    // Attempt 0 is the initial low, attempt 1 the high.
    let output = output.failing_at(1);
    let (tx, rx) = mpsc::sync_channel(1);
    tx.send(PinState::High).unwrap();

    let result = PatternDriver::new(output, OutputPattern::Steady, WriteErrorPolicy::Abort).run(rx);

    assert_eq!(result, Err(ErrorKind::Other));
    assert_eq!(bits(&log.levels()), [0, 0]);
    drop(tx);
}

#[test]
fn write_failure_is_logged_under_log_policy() -> Result<(), ErrorKind> {
    let (output, log) = RecordingOutput::new();
    let output = output.failing_at(1);
    let (tx, rx) = mpsc::sync_channel(2);
    tx.send(PinState::High).unwrap();
    tx.send(PinState::Low).unwrap();
    drop(tx);

    PatternDriver::new(output, OutputPattern::Steady, WriteErrorPolicy::Log).run(rx)?;
    // The failed high is skipped; the driver carries on to the low and exit.
    assert_eq!(bits(&log.levels()), [0, 0, 0]);
    Ok(())
}
