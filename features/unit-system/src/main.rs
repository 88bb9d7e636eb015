use std::sync::Arc;

use unit_system::{after, using_deps, SlotRegistry, SystemBuilder, UnitDescriptor};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut slots = SlotRegistry::new();
    let commands = slots.declare("commands");

    let shell = using_deps(
        vec![
            ("config", "config".into()),
            ("commands", slots.contributions(&commands).unwrap()),
        ],
        |deps| {
            let config = deps.get::<Config>("config")?;
            let commands = deps.contributions::<&str>("commands")?;
            Ok(Shell {
                prompt: config.prompt.clone(),
                commands: commands.iter().map(|c| c.to_string()).collect(),
            })
        },
    )
    .unwrap();

    let app = SystemBuilder::new()
        .add("shell", shell)
        .add("history", UnitDescriptor::new(|_| Ok(())).contribute(&commands, "history"))
        .add(
            "banner",
            after(["shell"], |deps| {
                let shell = deps.get::<Shell>("shell")?;
                Ok(format!("{} ({} commands)", shell.prompt, shell.commands.len()))
            })
            .unwrap(),
        )
        .add_value(
            "config",
            Config {
                prompt: "> ".to_string(),
            },
        )
        .add("exit", UnitDescriptor::new(|_| Ok(())).contribute(&commands, "exit"))
        .build(&slots)
        .unwrap();

    println!("{:?}", app);
    let shell: Arc<Shell> = app.require("shell").unwrap();
    println!("{:?}", shell);
    println!("{}", app.require::<String>("banner").unwrap());
}

#[derive(Debug)]
struct Config {
    prompt: String,
}

#[derive(Debug)]
struct Shell {
    prompt: String,
    commands: Vec<String>,
}
