//! Integration tests reading grid files from disk.

use popsynth_sim::errors::{GridError, GridWarning, HeaderProblem, RowDataErrorKind};
use popsynth_sim::grid::{
    BinaryStarSchema, Column, GridContext, GridReader, HeaderLayout, SingleStarSchema,
};
use std::io::Write;
use tempfile::NamedTempFile;

const CONTEXT: GridContext = GridContext {
    default_metallicity: 0.0142,
};

/// Helper to write a grid file
fn write_grid(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_single_star_grid_with_comments_and_crlf() {
    let file = write_grid(
        "# masses for the test population\r\n\
         \r\n\
         mass,\tMetallicity   # header\r\n\
         1.0, 0.02\r\n\
         # skipped\r\n\
         \t2.5 ,\r\n\
         8.0,,\r\n",
    );
    let mut reader = GridReader::<SingleStarSchema>::open(file.path(), CONTEXT).unwrap();
    assert_eq!(reader.layout(), HeaderLayout::Present);
    assert_eq!(reader.header().names(), vec!["MASS", "METALLICITY"]);

    let first = reader.read_record().unwrap().unwrap();
    assert_eq!((first.mass, first.metallicity), (1.0, 0.02));
    assert!(reader.warnings().is_empty());

    let second = reader.read_record().unwrap().unwrap();
    assert_eq!((second.mass, second.metallicity), (2.5, 0.0142));
    assert!(matches!(
        reader.warnings(),
        [GridWarning::MissingTrailingColumn { line: 6, column: "METALLICITY", .. }]
    ));

    let third = reader.read_record().unwrap().unwrap();
    assert_eq!((third.mass, third.metallicity), (8.0, 0.0142));
    assert_eq!(
        reader.warnings(),
        &[GridWarning::DefaultMetallicity {
            line: 7,
            value: 0.0142
        }]
    );

    assert!(reader.read_record().unwrap().is_none());
    assert!(reader.is_closed());
    assert_eq!(reader.rows_read(), 3);
}

#[test]
fn test_headerless_single_star_grid() {
    let file = write_grid("# no header\n0.8\n1.2, 0.001\n");
    let mut reader = GridReader::<SingleStarSchema>::open(file.path(), CONTEXT).unwrap();
    assert_eq!(reader.layout(), HeaderLayout::Absent);

    let first = reader.read_record().unwrap().unwrap();
    assert_eq!((first.mass, first.metallicity), (0.8, 0.0142));

    let second = reader.read_record().unwrap().unwrap();
    assert_eq!(second.mass, 1.2);
    assert!(matches!(
        reader.warnings(),
        [GridWarning::ExtraColumn { line: 3, position: 2 }]
    ));
}

#[test]
fn test_missing_file_is_file_access_error() {
    let err = GridReader::<BinaryStarSchema>::open("/no/such/grid.csv", CONTEXT).unwrap_err();
    assert!(matches!(err, GridError::FileAccess { .. }));
    assert!(err.to_string().contains("/no/such/grid.csv"));
}

#[test]
fn test_binary_header_problems_are_reported_together() {
    let file = write_grid("MASS_1,MASS_1,METALLICITY_1,METALLICITY_2,ECCENTRICITY,COLOUR\n");
    let err = GridReader::<BinaryStarSchema>::open(file.path(), CONTEXT).unwrap_err();
    let GridError::HeaderStructure { line, problems } = err else {
        panic!("expected a header error");
    };
    assert_eq!(line, 1);
    assert!(problems.contains(&HeaderProblem::Duplicate("MASS_1")));
    assert!(problems.contains(&HeaderProblem::Missing("MASS_2")));
    assert!(problems.contains(&HeaderProblem::MissingOneOf(&["SEPARATION", "PERIOD"])));
    assert!(problems.contains(&HeaderProblem::Unknown("COLOUR".to_string())));
}

#[test]
fn test_partial_kick_group_is_rejected() {
    let file = write_grid(
        "MASS_1,MASS_2,METALLICITY_1,METALLICITY_2,SEPARATION,ECCENTRICITY,KICK_VELOCITY_1\n",
    );
    let err = GridReader::<BinaryStarSchema>::open(file.path(), CONTEXT).unwrap_err();
    let GridError::HeaderStructure { problems, .. } = err else {
        panic!("expected a header error");
    };
    assert!(problems.contains(&HeaderProblem::Missing("KICK_THETA_1")));
    assert!(problems.contains(&HeaderProblem::Missing("KICK_MEAN_ANOMALY_2")));
}

#[test]
fn test_binary_grid_with_kicks() {
    let file = write_grid(
        "Mass_1, Mass_2, Metallicity_1, Metallicity_2, Separation, Eccentricity, \
         Kick_Velocity_1, Kick_Theta_1, Kick_Phi_1, Kick_Mean_Anomaly_1, \
         Kick_Velocity_2, Kick_Theta_2, Kick_Phi_2, Kick_Mean_Anomaly_2\n\
         20, 15, 0.02, 0.02, 3.5, 0.0, 250, 0.5, 1.0, 2.0, -1, 0.1, 0.2, 0.3\n",
    );
    let mut reader = GridReader::<BinaryStarSchema>::open(file.path(), CONTEXT).unwrap();
    assert!(reader.header().has_kicks());
    assert!(reader.header().contains(Column::KickPhi2));

    let row = reader.read_record().unwrap().unwrap();
    assert_eq!(row.total_mass(), 35.0);
    assert_eq!(row.separation, 3.5);
    let kick_1 = row.kick_1.unwrap();
    assert_eq!((kick_1.velocity, kick_1.mean_anomaly), (250.0, 2.0));
    assert_eq!(row.kick_2.unwrap().velocity, -1.0);
}

#[test]
fn test_bad_value_stops_the_grid() {
    let file = write_grid(
        "MASS_1,MASS_2,METALLICITY_1,METALLICITY_2,SEPARATION,ECCENTRICITY\n\
         10,8,0.02,0.02,1.0,0.0\n\
         10,eight,0.02,0.02,1.0,0.0\n\
         10,8,0.02,0.02,1.0,0.0\n",
    );
    let mut reader = GridReader::<BinaryStarSchema>::open(file.path(), CONTEXT).unwrap();
    assert!(reader.read_record().unwrap().is_some());

    let err = reader.read_record().unwrap_err();
    let GridError::RowData {
        line, column, kind, ..
    } = err
    else {
        panic!("expected a row error");
    };
    assert_eq!((line, column, kind), (3, "MASS_2", RowDataErrorKind::NotNumeric));

    assert!(reader.is_closed());
    assert!(reader.read_record().unwrap().is_none());
}
