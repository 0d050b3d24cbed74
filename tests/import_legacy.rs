use pretty_assertions::assert_eq;
use std::path::Path;

use allostat::analysis::model::OutcomeTag;
use allostat::classify::Category;
use allostat::error::ReportError;
use allostat::report::{import_report, ReportScheme};

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

#[test]
fn legacy_report_saved_as_csv_files() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "Statistiques.csv",
        "Analyse des Appels Allodoct - Statistiques Globales,,,,\n\
         Catégorie,Total,exam_not_found,exam_not_authorized,Tous les examens\n\
         IRM,3,2,1,IRM du genou\n\
         SCANNER,1,1,0,Scanner\n\
         ,,,,\n\
         Type,Nombre,,,\n\
         exam_not_found,3,,,\n\
         exam_not_authorized,1,,,\n",
    );
    write(
        dir.path(),
        "IRM.csv",
        "Catégorie,Examen Identifié,Occurrences,exam_not_found,exam_not_authorized,Id Externe\n\
         IRM,IRM du genou,2,1,1,501\n\
         IRM,IRM lombaire,1,1,0,502\n",
    );

    let report = import_report(dir.path()).unwrap();
    assert_eq!(report.scheme, ReportScheme::Legacy);
    assert!(report.generated_at.is_none());

    let nf = report.result.problem_stats(OutcomeTag::ExamNotFound);
    let cats: Vec<(Category, u64)> = nf.iter().map(|s| (s.category, s.total)).collect();
    assert_eq!(cats, vec![(Category::Irm, 3), (Category::Scanner, 1)]);
    let names: Vec<&str> = nf[0].exams.iter().map(|e| e.display_name.as_str()).collect();
    assert_eq!(names, vec!["IRM du genou", "IRM lombaire"]);
    assert_eq!(nf[0].exams[0].not_authorized, 1);
    assert_eq!(nf[0].unlisted, 0);
    assert_eq!(nf[1].unlisted, 1);

    assert!(report.result.appointments.is_empty());
    let s = &report.result.summary;
    assert_eq!(s.total_calls, 4);
    assert_eq!(s.distinct_exams, 2);
    assert_eq!(s.tag_count(OutcomeTag::ExamNotFound), 4);
}

#[test]
fn split_report_with_appointments() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "01_Stats_Problèmes.csv",
        "Catégorie,Total,Durée (secondes)\nECHOGRAPHIE,2,0\n",
    );
    write(
        dir.path(),
        "02_P_ECHOGRAPHIE.csv",
        "#,Examen,Total,Durée (secondes)\n1,Échographie abdominale,2,0\n",
    );
    write(
        dir.path(),
        "03_Stats_Rendez-vous.csv",
        "Catégorie,Total,Durée totale (s),Durée moyenne (s)\nRADIOGRAPHIE,4,200,50\n",
    );
    write(
        dir.path(),
        "04_RDV_RADIOGRAPHIE.csv",
        "#,Examen,Total,Durée totale (s),Durée moyenne (s)\n1,Radio du bassin,4,200,50\n",
    );

    let report = import_report(dir.path()).unwrap();
    assert_eq!(report.scheme, ReportScheme::Split);
    let nf = report.result.problem_stats(OutcomeTag::ExamNotFound);
    assert_eq!(nf[0].exams[0].normalized_key, "echographie abdominale");

    let rdv = &report.result.appointments[0];
    assert_eq!(rdv.category, Category::Radiographie);
    assert_eq!(rdv.exams[0].duration_average, 50);
    assert_eq!(report.result.summary.appointments_created, 4);
    assert_eq!(report.result.summary.average_duration, 50);
}

#[test]
fn foreign_directory_is_unknown_schema() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "budget.csv", "Poste,Montant\nLoyer,900\n");
    let err = import_report(dir.path()).unwrap_err();
    assert!(matches!(err, ReportError::UnknownSchema { .. }), "{err}");
}

#[test]
fn unreadable_manifest_is_corrupted_not_unknown() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "workbook.json", "{\"sheets\": 12}");
    let err = import_report(dir.path()).unwrap_err();
    assert!(matches!(err, ReportError::Corrupted(_)), "{err}");
}
