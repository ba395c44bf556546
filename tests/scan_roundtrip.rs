//! Full-pipeline tests over synthetic project trees on disk.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::tempdir;

use vstaudit_core::{render_report, AuditSession};

fn write_project(path: &Path, xml: &str) {
    let file = File::create(path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(xml.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

#[test]
fn empty_tree_yields_empty_state_and_the_no_plugins_report() {
    let dir = tempdir().unwrap();
    create_dir_all(dir.path().join("only/folders/here")).unwrap();

    let mut session = AuditSession::new();
    session.scan_directory(dir.path()).unwrap();

    assert!(session.usage().is_empty());
    assert!(session.projects().is_empty());
    assert_eq!(
        render_report(&session),
        "No VST plugins found in the scanned projects.\n"
    );
}

#[test]
fn repeated_use_within_one_project_counts_once() {
    let dir = tempdir().unwrap();
    write_project(
        &dir.path().join("busy.als"),
        r#"<Ableton>
            <TrackA>C:/Vendor/Synth.dll</TrackA>
            <TrackB>C:/Vendor/Synth.dll</TrackB>
            <TrackC Device="C:/Vendor/Synth.dll"/>
        </Ableton>"#,
    );

    let mut session = AuditSession::new();
    session.scan_directory(dir.path()).unwrap();

    assert_eq!(session.usage().get("Synth.dll"), Some(&1));
}

#[test]
fn two_file_round_trip_counts_and_attributes_correctly() {
    // File 1 references CompanyX/Widget.dll twice, file 2 only the bare
    // filename. Processed in that order: the count reaches 2, CompanyX's
    // attribution survives, and both projects are registered.
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.als");
    let second = dir.path().join("second.als");
    write_project(
        &first,
        r#"<Ableton>
            <A>D:/CompanyX/Widget.dll</A>
            <B>D:/CompanyX/Widget.dll</B>
        </Ableton>"#,
    );
    write_project(&second, "<Ableton><A>Widget.dll</A></Ableton>");

    let mut session = AuditSession::new();
    assert_eq!(session.process_file(&first), vec!["Widget.dll".to_string()]);
    assert_eq!(
        session.process_file(&second),
        vec!["Widget.dll".to_string()]
    );

    assert_eq!(session.usage().get("Widget.dll"), Some(&2));
    assert_eq!(session.manufacturer_of("Widget.dll"), "CompanyX");
    assert_eq!(session.project_count(), 2);
}

#[test]
fn later_files_never_overwrite_an_attribution() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.als");
    let second = dir.path().join("second.als");
    write_project(&first, "<Ableton><A>D:/CompanyX/Widget.dll</A></Ableton>");
    // The second file carries stronger browser-path evidence, which may
    // only influence resolution within its own file.
    write_project(
        &second,
        r#"<Ableton>
            <A>Widget.dll</A>
            <BrowserContentPath>
                <Value>query:Plugins#VST:CompanyZ:Widget</Value>
            </BrowserContentPath>
        </Ableton>"#,
    );

    let mut session = AuditSession::new();
    session.process_file(&first);
    session.process_file(&second);

    assert_eq!(session.manufacturer_of("Widget.dll"), "CompanyX");
}

#[test]
fn browser_path_evidence_wins_when_it_is_first() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("set.als");
    write_project(
        &path,
        r#"<Ableton>
            <A>D:/FolderName/Widget.dll</A>
            <BrowserContentPath>
                <Value>query:Plugins#VST:Real%20Vendor:Widget</Value>
            </BrowserContentPath>
        </Ableton>"#,
    );

    let mut session = AuditSession::new();
    session.process_file(&path);

    assert_eq!(session.manufacturer_of("Widget.dll"), "Real Vendor");
}

#[test]
fn corrupt_files_do_not_poison_their_siblings() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("corrupt.als"), b"definitely not gzip").unwrap();
    write_project(
        &dir.path().join("good.als"),
        "<Ableton><A>C:/Vendor/Alpha.dll</A></Ableton>",
    );

    let mut session = AuditSession::new();
    session.scan_directory(dir.path()).unwrap();

    assert_eq!(session.usage().get("Alpha.dll"), Some(&1));
    assert_eq!(session.project_count(), 1);
    assert_eq!(session.processed_files(), 2);
}

#[test]
fn scan_recurses_and_registers_every_project() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("older/2023");
    create_dir_all(&nested).unwrap();
    write_project(
        &dir.path().join("top.als"),
        "<Ableton><A>C:/Vendor/Alpha.dll</A></Ableton>",
    );
    write_project(
        &nested.join("deep.als"),
        "<Ableton><A>C:/Vendor/Beta.dll</A></Ableton>",
    );

    let mut session = AuditSession::new();
    session.scan_directory(dir.path()).unwrap();

    assert_eq!(session.project_count(), 2);
    assert_eq!(session.unique_plugins(), 2);
    assert_eq!(session.manufacturer_of("Alpha.dll"), "Vendor");
    assert_eq!(session.manufacturer_of("Beta.dll"), "Vendor");
}

#[test]
fn projects_without_plugins_stay_out_of_the_registry() {
    let dir = tempdir().unwrap();
    write_project(
        &dir.path().join("empty.als"),
        "<Ableton><MasterTrack/></Ableton>",
    );
    write_project(
        &dir.path().join("full.als"),
        "<Ableton><A>C:/Vendor/Alpha.dll</A></Ableton>",
    );

    let mut session = AuditSession::new();
    session.scan_directory(dir.path()).unwrap();

    assert_eq!(session.project_count(), 1);
    let registered: Vec<_> = session.projects().keys().collect();
    assert!(registered[0].ends_with("full.als"));
}

#[test]
fn report_reflects_a_real_scan() {
    let dir = tempdir().unwrap();
    write_project(
        &dir.path().join("set.als"),
        r#"<Ableton>
            <A>C:/TAL-Software/vst/TAL-Reverb-4.dll</A>
            <B>C:/Unheard Of/Obscure.dll</B>
        </Ableton>"#,
    );

    let mut session = AuditSession::new();
    session.scan_directory(dir.path()).unwrap();

    let report = render_report(&session);
    assert!(report.contains("Total Projects Scanned: 1"));
    assert!(report.contains("Total Unique VSTs Found: 2"));
    assert!(report.contains("TAL-Software:"));
    assert!(report.contains("Unheard Of:"));
    assert!(report.contains("set.als:"));
}
