//! Line-oriented terminal front end for one attempt.

use anyhow::bail;
use tokio::io::{AsyncBufReadExt, BufReader};

use assess_core::model::AssessmentId;
use services::{
    AssessmentSession, AssessmentSessionService, SessionError, SubmitKind, SubmitOutcome,
    TimerEvent,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Choose(usize),
    Next,
    Previous,
    Submit,
    Show,
    Quit,
    Unknown(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        match line {
            "n" | "next" => Self::Next,
            "p" | "prev" => Self::Previous,
            "s" | "submit" => Self::Submit,
            "" | "?" => Self::Show,
            "q" | "quit" => Self::Quit,
            other => match other.parse::<usize>() {
                Ok(n) if n > 0 => Self::Choose(n),
                _ => Self::Unknown(other.to_owned()),
            },
        }
    }
}

pub async fn run(service: &AssessmentSessionService, id: AssessmentId) -> anyhow::Result<()> {
    let mut session = match service.load(id).await {
        Ok(session) => session,
        Err(err) => {
            if let Some(route) = err.redirect() {
                println!("-> {route}");
            }
            return Err(err.into());
        }
    };

    println!("{}", session.assessment().title());
    if let Some(description) = session.assessment().description() {
        println!("{description}");
    }
    println!("commands: <number> choose, n next, p previous, s submit, q quit");

    let Some(mut events) = session.start() else {
        bail!("attempt already started");
    };
    show(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut timer_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            event = events.recv(), if timer_open => {
                let Some(event) = event else {
                    timer_open = false;
                    continue;
                };
                if let TimerEvent::Tick { remaining } = event {
                    announce_remaining(&session, remaining);
                }
                match session.handle_timer_event(event).await {
                    Ok(Some(SubmitOutcome::Submitted { route, .. })) => {
                        println!("-> {route}");
                        return Ok(());
                    }
                    Ok(_) => {}
                    // The notifier already reported it; `s` retries.
                    Err(err) => tracing::debug!(error = %err, "forced submission failed"),
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match Input::parse(&line) {
                    Input::Choose(n) => choose(&mut session, n),
                    Input::Next => {
                        if session.next_question() {
                            show(&session);
                        }
                    }
                    Input::Previous => {
                        if session.previous_question() {
                            show(&session);
                        }
                    }
                    Input::Show => show(&session),
                    Input::Submit => match session.submit(SubmitKind::Manual).await {
                        Ok(SubmitOutcome::Submitted { route, .. }) => {
                            println!("-> {route}");
                            return Ok(());
                        }
                        Ok(SubmitOutcome::Ignored) | Err(_) => {}
                    },
                    Input::Quit => break,
                    Input::Unknown(raw) => eprintln!("unknown command: {raw}"),
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    if !session.state().is_terminal() {
        tracing::info!(state = ?session.state(), "left attempt without submitting");
    }
    Ok(())
}

fn choose(session: &mut AssessmentSession, n: usize) {
    let Some(question) = session.current_question() else {
        return;
    };
    let Some(option) = question.options().get(n - 1).cloned() else {
        eprintln!("no option {n}");
        return;
    };
    let question_id = question.id();
    match session.record_answer(question_id, option) {
        Ok(()) => show(session),
        Err(err @ (SessionError::TimeExpired | SessionError::AlreadySubmitted)) => {
            eprintln!("{err}");
        }
        Err(err) => eprintln!("cannot record answer: {err}"),
    }
}

fn show(session: &AssessmentSession) {
    let progress = session.progress();
    let Some(question) = session.current_question() else {
        println!("(this assessment has no questions)");
        return;
    };
    println!();
    println!(
        "[{}/{}] {:.0}% | answered {} | {} ({})",
        progress.current_index + 1,
        progress.question_count,
        progress.completion_percent,
        progress.answered,
        progress.remaining_display,
        progress.severity,
    );
    let answered = if session.answers().is_answered(question.id()) {
        " (answered)"
    } else {
        ""
    };
    println!("{}{answered}", question.text());
    let selected = session.answers().get(question.id());
    for (i, option) in question.options().iter().enumerate() {
        let marker = if selected == Some(option.as_str()) { '>' } else { ' ' };
        println!("{marker} {}. {option}", i + 1);
    }
}

fn announce_remaining(session: &AssessmentSession, remaining: u32) {
    if remaining > 0 && (remaining % 60 == 0 || remaining <= 10) {
        let progress = session.progress();
        eprintln!("time left: {} ({})", progress.remaining_display, progress.severity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Input::parse(" 2 "), Input::Choose(2));
        assert_eq!(Input::parse("n"), Input::Next);
        assert_eq!(Input::parse("prev"), Input::Previous);
        assert_eq!(Input::parse("s"), Input::Submit);
        assert_eq!(Input::parse(""), Input::Show);
        assert_eq!(Input::parse("q"), Input::Quit);
        assert_eq!(Input::parse("0"), Input::Unknown("0".into()));
        assert_eq!(Input::parse("x"), Input::Unknown("x".into()));
    }
}
