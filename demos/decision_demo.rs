// demos/decision_demo.rs

use lft::{LftConfig, LftError, LogicForceProcessor, QuantumDecisionSystem, QuantumState};

fn main() -> Result<(), LftError> {
    let mut system = QuantumDecisionSystem::from_patterns(
        vec![
            ("greeting", vec!["hello", "hi", "hey"]),
            ("command", vec!["create", "update", "delete"]),
            ("question", vec!["what", "why", "how"]),
        ],
        LftConfig::default(),
    )?;

    println!("--- Decisions ---");
    for text in ["hello there", "create a file", "why is that", "hello create", "nothing to see"] {
        let result = system.process(text)?;
        println!("{:<16} -> {}", text, result);
    }

    println!("\n--- Calibration ---");
    let training = vec![
        ("hello there", "greeting"),
        ("hi", "greeting"),
        ("create a file", "command"),
        ("what now", "question"),
    ];
    system.calibrate(training)?;
    for (category, weight) in system.rules().weights() {
        println!("{:<10} weight {:.3}", category, weight);
    }

    println!("\n--- Vector force ---");
    let mut processor = LogicForceProcessor::new(LftConfig::default())?;
    processor.add_rule("greeting", &["hello", "hi"], 0.9, Some("social"))?;
    processor.add_rule("command", &["creat*", "update"], 0.7, Some("task"))?;

    let force = processor.calculate_force("hello creating things", Some("task"));
    println!("force: {}", force);
    println!("actionable: {}", processor.is_actionable(&force));

    let state = processor.to_quantum_state(&force)?;
    println!("encoded: {}", state);
    let blended = processor.apply_force(&QuantumState::zero_state(state.num_qubits())?, &force)?;
    println!("blended: {}", blended);

    Ok(())
}
