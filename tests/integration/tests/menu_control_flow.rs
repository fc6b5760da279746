use std::io::Cursor;

use boxen_engine::{
    CommandError, CommandProcessor, CommandResult, CommandTable, Context, Flow, Invocation,
    LoopOptions, LoopOutcome, Menu, ScopePath, Session, Terminal,
};
use boxen_model::BoxModel;
use boxen_render::TemplateStore;

const LEVELS: [&str; 3] = ["l1", "l2", "l3"];

/// Level `depth` of a three-level menu stack. `descend` spawns the next level:
/// L2 with exits caught, L3 with exits handed up. `jump` spawns a level that
/// catches exits and then resumes at L1.
struct Level {
    depth: usize,
}

fn log(context: &mut Context, event: String) {
    let mut events = context
        .get_str("events")
        .map(str::to_string)
        .unwrap_or_default();
    events.push_str(&event);
    events.push(';');
    context.insert("events", events);
}

fn spawn_next(
    level: &Level,
    terminal: &mut Terminal<'_, '_>,
    context: &mut Context,
    options: LoopOptions,
) -> CommandResult {
    let next = level.depth + 1;
    if next >= LEVELS.len() {
        return Err(CommandError::syntax("descend"));
    }
    let scopes = terminal.scopes().child(LEVELS[next]);
    terminal.spawn(Level { depth: next }, scopes, options, context)
}

fn do_descend(
    level: &mut Level,
    terminal: &mut Terminal<'_, '_>,
    _: &Invocation,
    context: &mut Context,
) -> CommandResult {
    let options = if level.depth == 0 {
        LoopOptions::default().catch_exit()
    } else {
        LoopOptions::default()
    };
    spawn_next(level, terminal, context, options)
}

fn do_jump(
    level: &mut Level,
    terminal: &mut Terminal<'_, '_>,
    _: &Invocation,
    context: &mut Context,
) -> CommandResult {
    spawn_next(
        level,
        terminal,
        context,
        LoopOptions::default().catch_exit().return_to(LEVELS[0]),
    )
}

fn do_quit(_: &mut Level, _: &mut Terminal<'_, '_>, _: &Invocation, _: &mut Context) -> CommandResult {
    Ok(Flow::Exit)
}

fn do_mark(
    level: &mut Level,
    _: &mut Terminal<'_, '_>,
    _: &Invocation,
    context: &mut Context,
) -> CommandResult {
    log(context, format!("mark@{}", LEVELS[level.depth]));
    Ok(Flow::Continue)
}

impl Menu for Level {
    fn commands() -> CommandTable<Self> {
        CommandTable::new()
            .command("descend", do_descend)
            .command("jump", do_jump)
            .command("mark", do_mark)
            .command("quit", do_quit)
    }

    fn on_exit(
        &mut self,
        _: &mut Terminal<'_, '_>,
        context: &mut Context,
    ) -> Result<(), CommandError> {
        log(context, format!("exit@{}", LEVELS[self.depth]));
        Ok(())
    }

    fn on_error(
        &mut self,
        _: &mut Terminal<'_, '_>,
        context: &mut Context,
        command: &str,
    ) -> Result<(), CommandError> {
        log(context, format!("error@{}:{command}", LEVELS[self.depth]));
        Ok(())
    }
}

fn run_levels(lines: &str) -> (LoopOutcome, String) {
    let mut model = BoxModel::new("test", "stack", "1", "stack-1");
    let renderer = TemplateStore::from_sources(Vec::<(String, String)>::new()).expect("templates");
    let mut input = Cursor::new(lines.as_bytes().to_vec());
    let mut output = Vec::new();
    let mut context = Context::new();
    let mut session = Session::new(&mut model, &renderer, &mut input, &mut output);
    let terminal = Terminal::new(&mut session, ScopePath::new([LEVELS[0]]));
    let mut processor = CommandProcessor::new(Level { depth: 0 }, terminal);
    let outcome = processor
        .run(&mut context, LoopOptions::top_level())
        .expect("run");
    let events = context.get_str("events").unwrap_or_default().to_string();
    (outcome, events)
}

#[test]
fn integration_exit_in_l3_ends_l2_and_resumes_l1() {
    let (outcome, events) = run_levels("descend\ndescend\nquit\nmark\n");
    assert_eq!(outcome, LoopOutcome::Completed);
    assert_eq!(events, "exit@l3;exit@l2;mark@l1;exit@l1;");
}

#[test]
fn integration_exit_caught_at_l2_does_not_end_l1() {
    let (outcome, events) = run_levels("descend\nquit\nmark\nquit\nmark\n");
    assert_eq!(outcome, LoopOutcome::Completed);
    assert_eq!(events, "exit@l2;mark@l1;exit@l1;");
}

#[test]
fn integration_return_to_skips_intermediate_level() {
    let (outcome, events) = run_levels("descend\njump\nmark\nquit\nmark\n");
    assert_eq!(outcome, LoopOutcome::Completed);
    assert_eq!(events, "mark@l3;exit@l3;mark@l1;exit@l1;");
}

#[test]
fn integration_unknown_command_at_bare_scope_is_a_syntax_error() {
    let (outcome, events) = run_levels("frobnicate\n");
    assert_eq!(outcome, LoopOutcome::Completed);
    assert_eq!(events, "error@l1:frobnicate;exit@l1;");
}
