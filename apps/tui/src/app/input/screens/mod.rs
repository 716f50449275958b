use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

mod chart;
mod help;
mod home;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    if key == KeyCode::Char('q') {
        app.running = false;
        return;
    }

    match app.screen {
        AppScreen::Home => home::handle_home_input(app, key),
        AppScreen::Chart => chart::handle_chart_input(app, key),
    }
}

#[cfg(test)]
mod tests {
    use super::dispatch_input;
    use crate::app::state::{App, AppOptions, AppScreen, Effect, HomePanel};
    use charts_core::Platform;
    use crossterm::event::KeyCode;

    #[test]
    fn q_quits_from_any_screen() {
        let mut app = App::new(AppOptions::default());
        app.open_chart(Platform::Spotify, None);

        dispatch_input(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let mut app = App::new(AppOptions::default());

        dispatch_input(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        dispatch_input(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        dispatch_input(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }

    #[test]
    fn number_keys_jump_to_platform_lists() {
        let mut app = App::new(AppOptions::default());

        dispatch_input(&mut app, KeyCode::Char('4'));
        assert_eq!(app.screen, AppScreen::Chart);
        assert_eq!(app.platform, Platform::Billboard);

        dispatch_input(&mut app, KeyCode::Right);
        assert_eq!(app.platform, Platform::TopSongs);
        dispatch_input(&mut app, KeyCode::Tab);
        assert_eq!(app.chart_code, "top_monthly");

        dispatch_input(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, AppScreen::Home);
    }

    #[test]
    fn home_keys_move_focus_and_pause_rotation() {
        let mut app = App::new(AppOptions::default());

        dispatch_input(&mut app, KeyCode::Down);
        assert_eq!(app.home_focus, HomePanel::TopArtists);
        dispatch_input(&mut app, KeyCode::Char('p'));
        assert!(!app.widgets[1].rotation.is_rotating());
        dispatch_input(&mut app, KeyCode::Char('p'));
        assert!(app.widgets[1].rotation.is_rotating());

        app.take_effects();
        dispatch_input(&mut app, KeyCode::Enter);
        assert_eq!(app.platform, Platform::TopArtists);
        assert!(matches!(app.take_effects().as_slice(), [Effect::Load(_)]));
    }
}
