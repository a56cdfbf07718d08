use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What the focused screen is currently accepting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    Menu,
    Study,
    QuizChoice,
    QuizInput,
    QuizAssemble,
    QuizResult,
    /// A request is pending or failed; only retry and back make sense.
    Waiting,
    Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    Back,
    MenuUp,
    MenuDown,
    MenuSelect,
    Flip,
    Confirm,
    CursorPrev,
    CursorNext,
    SwitchRow,
    Activate,
    Type(char),
    Backspace,
    Submit,
    NextQuestion,
    Retry,
    Ignore,
}

pub fn map_key(context: KeyContext, key: KeyEvent) -> UiCommand {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return UiCommand::Quit;
    }
    if ctrl && key.code == KeyCode::Char('s') {
        return match context {
            KeyContext::QuizChoice | KeyContext::QuizInput | KeyContext::QuizAssemble => {
                UiCommand::Submit
            }
            _ => UiCommand::Ignore,
        };
    }

    match context {
        KeyContext::Menu => match key.code {
            KeyCode::Up | KeyCode::Char('k') => UiCommand::MenuUp,
            KeyCode::Down | KeyCode::Char('j') => UiCommand::MenuDown,
            KeyCode::Enter => UiCommand::MenuSelect,
            KeyCode::Esc | KeyCode::Char('q') => UiCommand::Quit,
            _ => UiCommand::Ignore,
        },
        KeyContext::Study => match key.code {
            KeyCode::Char(' ') => UiCommand::Flip,
            KeyCode::Enter => UiCommand::Confirm,
            KeyCode::Esc => UiCommand::Back,
            _ => UiCommand::Ignore,
        },
        KeyContext::QuizChoice => match key.code {
            KeyCode::Up | KeyCode::Char('k') => UiCommand::CursorPrev,
            KeyCode::Down | KeyCode::Char('j') => UiCommand::CursorNext,
            KeyCode::Enter => UiCommand::Activate,
            KeyCode::Esc => UiCommand::Back,
            _ => UiCommand::Ignore,
        },
        KeyContext::QuizInput => match key.code {
            KeyCode::Enter => UiCommand::Submit,
            KeyCode::Backspace => UiCommand::Backspace,
            KeyCode::Esc => UiCommand::Back,
            KeyCode::Char(c) => UiCommand::Type(c),
            _ => UiCommand::Ignore,
        },
        KeyContext::QuizAssemble => match key.code {
            KeyCode::Left | KeyCode::Char('h') => UiCommand::CursorPrev,
            KeyCode::Right | KeyCode::Char('l') => UiCommand::CursorNext,
            KeyCode::Up | KeyCode::Down | KeyCode::Tab => UiCommand::SwitchRow,
            KeyCode::Enter => UiCommand::Activate,
            KeyCode::Esc => UiCommand::Back,
            _ => UiCommand::Ignore,
        },
        KeyContext::QuizResult => match key.code {
            KeyCode::Enter => UiCommand::NextQuestion,
            KeyCode::Esc => UiCommand::Back,
            _ => UiCommand::Ignore,
        },
        KeyContext::Waiting => match key.code {
            KeyCode::Char('r') => UiCommand::Retry,
            KeyCode::Esc => UiCommand::Back,
            _ => UiCommand::Ignore,
        },
        KeyContext::Message => match key.code {
            KeyCode::Enter | KeyCode::Esc => UiCommand::Back,
            _ => UiCommand::Ignore,
        },
    }
}
