use emtsim::prelude::*;
use emtsim_core::error::RequestKind;
use emtsim_std::steps::{
    airway::OPA_INSERTED, avpu::CPR_SUCCESS, circulation::SHOCK_TREATMENT,
    life_threats::{CHEST_GSW_TREATMENT, OCCLUSIVE_DRESSING},
    rapid_trauma::{FULL_IMMOBILIZATION, PELVIC_STABILIZATION},
    transport::SHOCK_PROTOCOL,
};
use emtsim_runtime::orchestrator::WELCOME_DELAY;
use emtsim_test::{Autopilot, ScriptedToolbox, assert_narrated, assert_not_narrated};

/// Chest GSW, alert and oriented, adequate breathing, no shock, stable
/// pelvis, no further injury.
const ALERT_CHEST_GSW: &[&str] = &[
    "TRAUMA", "GSW", "CHEST", "YES", "YES", "YES", "NORMAL", "WARM/DRY", "YES", "NO",
];

/// Chest GSW with failed CPR; airway management then runs on the
/// unassessed patient.
const DECEASED_CHEST_GSW: &[&str] = &[
    "TRAUMA", "GSW", "CHEST", "NO", "NO", "NO", "NO", "CLEAR", "YES", "YES", "NORMAL",
    "WARM/DRY", "YES", "NO",
];

async fn scripted(answers: &[&str], halt: HaltPolicy) -> (RunReport, ScriptedToolbox) {
    let tools = ScriptedToolbox::new(answers.to_vec());
    let report = Orchestrator::new(standard_catalog())
        .with_halt_policy(halt)
        .run(&tools)
        .await
        .unwrap();
    assert_eq!(tools.remaining_answers(), 0, "script not fully consumed");
    (report, tools)
}

#[tokio::test]
async fn chest_gsw_is_sealed_and_treated() {
    let (report, tools) = scripted(ALERT_CHEST_GSW, HaltPolicy::default()).await;

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert!(report.record.has_intervention(OCCLUSIVE_DRESSING));
    assert!(report.record.has_treatment(CHEST_GSW_TREATMENT));
    assert_narrated!(
        tools,
        "SIMULATION COMPLETE - PATIENT SUMMARY",
        "  GSW Location: CHEST",
        "Treatments Applied:",
        "  1. Treated GSW to chest with occlusive dressing",
        "Interventions Applied:",
        "  1. Occlusive dressing applied to chest",
        "⚕ SYSTEM: Assessment protocol completed successfully."
    );
}

#[tokio::test]
async fn failed_cpr_continues_by_default() {
    let (report, tools) = scripted(DECEASED_CHEST_GSW, HaltPolicy::default()).await;

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert!(!report.record.has_pulse);
    assert_eq!(report.record.avpu_status, None);
    assert!(
        tools
            .messages()
            .iter()
            .any(|m| m.kind == MessageKind::Critical && m.text.contains("PATIENT DECEASED"))
    );
    // The guard admits airway management because AVPU was never assigned.
    assert!(report.timeline.entered().contains(&"5"));
    assert!(report.record.airway_patent);
    assert!(report.record.has_intervention(OPA_INSERTED));
    assert!(!report.record.has_intervention(CPR_SUCCESS));
}

#[tokio::test]
async fn failed_cpr_halts_when_configured() {
    let answers = &DECEASED_CHEST_GSW[..7];
    let halt = HaltPolicy {
        on_death: true,
        on_placeholder: false,
    };
    let (report, tools) = scripted(answers, halt).await;

    assert_eq!(
        report.outcome,
        RunOutcome::Halted {
            step: "4".into(),
            reason: "patient deceased".into()
        }
    );
    assert_eq!(report.timeline.entered(), vec!["1", "2", "3", "4"]);
    assert_narrated!(
        tools,
        "⚕ SYSTEM: Protocol halted after step 4: patient deceased.",
        "SIMULATION COMPLETE - PATIENT SUMMARY",
        "  AVPU: Not assessed"
    );
}

#[tokio::test]
async fn alert_patient_skips_airway_management() {
    let (report, tools) = scripted(ALERT_CHEST_GSW, HaltPolicy::default()).await;

    assert_eq!(report.record.avpu_status, Some(AvpuLevel::Alert));
    assert!(report.record.airway_patent);
    assert_eq!(report.timeline.skipped(), vec!["5"]);
    assert_eq!(
        report.timeline.entered(),
        vec!["1", "2", "3", "4", "6", "7", "8", "9", "9b", "10"]
    );
    assert_not_narrated!(tools, "STEP 5: AIRWAY (A) MANAGEMENT");
    assert_eq!(
        tools.phases(),
        vec![
            Phase::AwaitingCallType,
            Phase::AwaitingTraumaType,
            Phase::RunningStepSequence,
            Phase::Complete
        ]
    );
}

#[tokio::test]
async fn conjunctiva_fallback_detects_shock() {
    let answers = [
        "TRAUMA",
        "GSW",
        "CHEST",
        "YES",
        "YES",
        "YES",
        "NORMAL",
        "TOO COLD OR HOT OUTSIDE",
        "GREY/ASHY",
        "YES",
        "NO",
    ];
    let (report, tools) = scripted(&answers, HaltPolicy::default()).await;

    assert!(report.record.is_in_shock);
    assert!(report.record.has_treatment(SHOCK_TREATMENT));
    assert!(report.record.has_intervention(SHOCK_PROTOCOL));
    assert_narrated!(tools, "  Shock Status: Present");
}

#[tokio::test]
async fn pelvis_branches() {
    let mut unstable = ALERT_CHEST_GSW.to_vec();
    unstable[8] = "NO";
    let (report, tools) = scripted(&unstable, HaltPolicy::default()).await;
    assert!(report.record.has_intervention(PELVIC_STABILIZATION));
    assert!(
        tools
            .messages()
            .iter()
            .any(|m| m.kind == MessageKind::Critical && m.text.contains("PELVIS UNSTABLE"))
    );

    let (report, tools) = scripted(ALERT_CHEST_GSW, HaltPolicy::default()).await;
    assert!(!report.record.has_intervention(PELVIC_STABILIZATION));
    assert_narrated!(tools, "➤ EMT: GENITALIA FOR BLEEDING...");
    assert!(report.record.has_intervention(FULL_IMMOBILIZATION));
}

#[tokio::test]
async fn logs_only_grow_and_classification_is_assigned_once() {
    let (report, tools) = scripted(DECEASED_CHEST_GSW, HaltPolicy::default()).await;

    let snapshots = tools.snapshots();
    for pair in snapshots.windows(2) {
        assert!(pair[1].interventions.len() >= pair[0].interventions.len());
        assert!(pair[1].treatments_applied.len() >= pair[0].treatments_applied.len());
        assert!(pair[1].interventions.starts_with(&pair[0].interventions));
    }

    let assignments = |name: &str| report.journal.iter().filter(|a| a.name() == name).count();
    assert_eq!(assignments("SET_CALL_TYPE"), 1);
    assert_eq!(assignments("SET_TRAUMA_TYPE"), 1);
}

#[tokio::test]
async fn abdominal_gsw_is_a_placeholder_that_does_not_stop_the_run() {
    let mut answers = ALERT_CHEST_GSW.to_vec();
    answers[2] = "ABDOMEN";
    let (report, tools) = scripted(&answers, HaltPolicy::default()).await;

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.record.gsw_location, Some(GswLocation::Abdomen));
    assert!(report.record.treatments_applied.is_empty());
    assert_narrated!(tools, "⚕ SYSTEM: ABDOMEN GSW protocol is under development.");
}

#[tokio::test]
async fn placeholder_halts_when_configured() {
    let halt = HaltPolicy {
        on_death: false,
        on_placeholder: true,
    };
    let (report, _) = scripted(&["TRAUMA", "GSW", "ARM"], halt).await;

    assert_eq!(
        report.outcome,
        RunOutcome::Halted {
            step: "2".into(),
            reason: "GSW to ARM is not implemented".into()
        }
    );
}

#[tokio::test]
async fn ladder_fall_runs_the_same_sequence() {
    let mut answers = ALERT_CHEST_GSW.to_vec();
    answers[1] = "LADDER_FALL";
    let halt = HaltPolicy {
        on_death: false,
        on_placeholder: true,
    };
    let (report, tools) = scripted(&answers, halt).await;

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.record.trauma_type, Some(TraumaType::LadderFall));
    assert_eq!(report.record.gsw_location, Some(GswLocation::Chest));
    assert!(report.record.has_intervention(OCCLUSIVE_DRESSING));
    assert_eq!(report.timeline.entered().len(), 10);
    assert_eq!(tools.prompts()[2], "Where is the gunshot wound?");
    assert_narrated!(
        tools,
        "⚕ SYSTEM: MOI: 25-YEAR-OLD MALE, fell approximately 20 feet from a ladder.",
        "  GSW Location: CHEST"
    );
}

#[tokio::test]
async fn welcome_banner_holds_before_the_first_prompt() {
    let (_, tools) = scripted(&["MEDICAL"], HaltPolicy::default()).await;

    assert_eq!(tools.texts()[1], "Emergency Medical Services Training");
    assert_eq!(tools.delay_hints()[1], WELCOME_DELAY);
}

#[tokio::test]
async fn medical_call_is_not_implemented() {
    let (report, tools) = scripted(&["MEDICAL"], HaltPolicy::default()).await;

    assert!(matches!(report.outcome, RunOutcome::NotImplemented { .. }));
    assert_eq!(report.record.call_type, Some(CallType::Medical));
    assert_narrated!(
        tools,
        "MEDICAL PROTOCOL",
        "⚕ SYSTEM: Medical protocol is under development.",
        "⚕ SYSTEM: This branch will be implemented in a future update."
    );
    assert_not_narrated!(tools, "SIMULATION COMPLETE - PATIENT SUMMARY");
}

#[tokio::test]
async fn report_round_trips_through_json() {
    let (report, _) = scripted(ALERT_CHEST_GSW, HaltPolicy::default()).await;
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["outcome"]["kind"], "completed");
    assert_eq!(json["record"]["avpu_status"], "ALERT");
    assert_eq!(json["journal"][0]["type"], "SET_CALL_TYPE");
    assert_eq!(json["journal"][0]["payload"], "TRAUMA");
}

// Live sessions

fn live_session() -> Session {
    Session::new(EngineConfig::instant()).unwrap()
}

#[tokio::test]
async fn autopilot_completes_a_live_session_then_reset_restores_defaults() {
    let session = live_session();
    let pilot = Autopilot::new(ALERT_CHEST_GSW.to_vec()).spawn(session.clone());

    let report = Orchestrator::new(standard_catalog())
        .run(&session)
        .await
        .unwrap();
    let flight = pilot.await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(flight.answered.len(), ALERT_CHEST_GSW.len());
    assert!(flight.continues > 0);
    assert_eq!(flight.final_state, Some(SessionState::Complete));
    assert_eq!(session.patient(), report.record);

    let again = Orchestrator::new(standard_catalog())
        .run(&session)
        .await
        .unwrap_err();
    assert!(matches!(again, ProtocolError::NotIdle));
    assert_eq!(session.state(), SessionState::Complete);

    session.reset().unwrap();
    assert_eq!(session.patient(), PatientRecord::default());
    assert!(session.messages().is_empty());
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.phase(), Phase::AwaitingCallType);
}

#[tokio::test]
async fn strict_session_rejects_unoffered_answers() {
    let mut script = ALERT_CHEST_GSW.to_vec();
    script.insert(1, "BOGUS");

    let session = live_session();
    let pilot = Autopilot::new(script).spawn(session.clone());
    let report = Orchestrator::new(standard_catalog())
        .run(&session)
        .await
        .unwrap();
    let flight = pilot.await.unwrap();

    assert_eq!(flight.rejected, vec!["BOGUS"]);
    assert_eq!(report.record.trauma_type, Some(TraumaType::Gsw));
    assert_eq!(flight.prompts()[1], "What type of trauma call?");
}

#[tokio::test]
async fn abandoned_session_keeps_record_and_narration() {
    let session = live_session();
    let pilot = Autopilot::new(["TRAUMA", "GSW", "CHEST"]).spawn(session.clone());

    let err = Orchestrator::new(standard_catalog())
        .run(&session)
        .await
        .unwrap_err();
    let flight = pilot.await.unwrap();

    assert!(matches!(err, ProtocolError::Abandoned(RequestKind::Input)));
    assert_eq!(flight.final_state, Some(SessionState::Abandoned));

    let patient = session.patient();
    assert_eq!(patient.call_type, Some(CallType::Trauma));
    assert!(patient.has_intervention(OCCLUSIVE_DRESSING));
    let last = session.messages().pop().unwrap();
    assert_eq!(last.text, "➤ EMT: 'HEY MAN, ARE YOU AWAKE?'");

    session.reset().unwrap();
    assert_eq!(session.patient(), PatientRecord::default());
}
