mod common;

use std::rc::Rc;

use common::MockOutput;
use sd_results::*;

#[test]
fn time_series_binds_rows_to_steps() {
    let (sdat, calls) = MockOutput::new()
        .time_series(&[0, 50, 100, 150], 3)
        .into_dataset();

    let step = sdat.steps().get(50).unwrap();
    assert_eq!(step.itsnap().unwrap(), Some(1));
    assert_eq!(calls.time_series.get(), 1);

    // every listed step got its row when the file was read
    assert!(sdat.step_registry().contains(150));
    assert_eq!(sdat.steps().get(150).unwrap().itsnap().unwrap(), Some(3));
    assert_eq!(sdat.steps().get(60).unwrap().itsnap().unwrap(), None);
    assert_eq!(calls.time_series.get(), 1);

    let info = step.timeinfo().unwrap().unwrap();
    assert_eq!(info.itsnap(), 1);
    assert_eq!(info.istep(), 50);
    assert_eq!(info.time(), 0.5);
    assert_eq!(info.values().to_vec(), vec![50.0; 3]);

    let series = sdat.tseries().unwrap().unwrap();
    assert_eq!(series.len(), 4);
    assert_eq!(series.times(), &[0.0, 0.5, 1.0, 1.5]);
    assert!(Rc::ptr_eq(&series, &sdat.tseries().unwrap().unwrap()));
    assert_eq!(calls.time_series.get(), 1);
}

#[test]
fn duplicated_step_keeps_its_first_row() {
    let (sdat, _) = MockOutput::new()
        .time_series(&[0, 10, 10, 20], 1)
        .into_dataset();

    assert_eq!(sdat.steps().get(10).unwrap().itsnap().unwrap(), Some(1));
    assert_eq!(sdat.steps().get(20).unwrap().itsnap().unwrap(), Some(3));
}

#[test]
fn missing_time_file_is_not_an_error() {
    let (sdat, calls) = MockOutput::new().into_dataset();
    let step = sdat.steps().get(10).unwrap();

    assert_eq!(step.itsnap().unwrap(), None);
    assert!(step.timeinfo().unwrap().is_none());
    assert!(sdat.tseries().unwrap().is_none());
    assert!(sdat.steps().get(20).unwrap().timeinfo().unwrap().is_none());
    assert_eq!(calls.time_series.get(), 1);
}

#[test]
fn ragged_time_series_is_an_error() {
    let (sdat, _) = MockOutput::new()
        .time_rows(vec![
            TimeSeriesRow {
                istep: 0,
                time: 0.0,
                scalars: vec![1.0, 2.0],
            },
            TimeSeriesRow {
                istep: 1,
                time: 0.1,
                scalars: vec![1.0],
            },
        ])
        .into_dataset();

    let err = sdat.steps().get(0).unwrap().timeinfo().unwrap_err();
    assert!(matches!(
        err,
        ResultsError::InconsistentSeriesLength {
            expected: 2,
            found: 1,
            ..
        }
    ));
}

#[test]
fn radial_profiles_by_step() {
    let (sdat, calls) = MockOutput::new()
        .profiles(&[0, 100, 200], 5)
        .into_dataset();

    let step = sdat.steps().get(100).unwrap();
    assert_eq!(step.irsnap().unwrap(), Some(1));

    let prof = step.rprof().unwrap().unwrap();
    assert_eq!(prof.irsnap(), 1);
    assert_eq!(prof.istep(), 100);
    assert_eq!(prof.time(), 1.0);
    assert_eq!(prof.table().dim(), (5, 3));
    assert_eq!(
        prof.column("t").unwrap().unwrap().to_vec(),
        vec![100.0, 101.0, 102.0, 103.0, 104.0]
    );
    assert_eq!(prof.column("r").unwrap().unwrap()[4], 4.0);
    assert!(prof.column("eta").unwrap().is_none());
    assert!(matches!(
        prof.column("viscosity"),
        Err(ResultsError::UnknownProfileVariable { .. })
    ));

    assert!(sdat.steps().get(150).unwrap().rprof().unwrap().is_none());
    assert_eq!(calls.profiles.get(), 1);
    assert_eq!(calls.time_series.get(), 0);
}

#[test]
fn series_and_snapshots_meet_on_the_same_step() {
    let (sdat, calls) = MockOutput::new()
        .snapshot(0, 0, &[RecordKind::Temperature])
        .snapshot(1, 100, &[RecordKind::Temperature])
        .time_series(&[0, 50, 100], 2)
        .profiles(&[0, 100], 4)
        .into_dataset();

    let series = sdat.tseries().unwrap().unwrap();
    assert_eq!(series.isteps(), &[0, 50, 100]);

    let snap = sdat.snaps().get(1).unwrap();
    assert_eq!(snap.itsnap().unwrap(), Some(2));
    assert_eq!(snap.irsnap().unwrap(), Some(1));
    assert!(snap.field("t").unwrap().is_some());
    assert_eq!(calls.step_number.get(), 1);
    assert_eq!(calls.time_series.get(), 1);
    assert_eq!(calls.profiles.get(), 1);
}
