// src/controller/tests.rs

use super::*;
use crate::backends::mock::{DrawCommand, MockDriver};
use crate::knight::distance;
use test_log::test;

fn controller_with(size: usize, mode: RevealMode) -> BoardController {
    let mut config = Config::default();
    config.board.tiles_per_vertex = size;
    config.board.reveal_mode = mode;
    BoardController::new(config, 80, 24)
}

fn controller(size: usize) -> BoardController {
    controller_with(size, RevealMode::Toggle)
}

fn distances(c: &BoardController) -> Vec<Option<u32>> {
    c.board().cells().iter().map(|cell| cell.distance).collect()
}

fn key(c: char) -> BackendEvent {
    BackendEvent::Key {
        symbol: KeySymbol::Char(c),
        modifiers: Modifiers::empty(),
        text: c.to_string(),
    }
}

#[test]
fn first_click_computes_and_reveals() {
    let mut c = controller(8);
    c.apply(BoardAction::EvaluateSquare { x: 7, y: 7 }).unwrap();
    let cell = c.board().cell(7, 7).unwrap();
    assert_eq!(cell.distance, Some(distance(7, 7).unwrap()));
    assert!(cell.revealed);

    let hsla = c.color_for(cell).unwrap();
    assert_eq!(hsla.hue, 6.0 * 360.0 / 8.0 / 0.75);
    assert_eq!(hsla.saturation, 80.0);
    assert_eq!(hsla.lightness, 40.0);
    assert_eq!(hsla.alpha, 0.8);
}

#[test]
fn toggle_mode_hides_and_keeps_cache() {
    let mut c = controller(8);
    c.evaluate_square(2, 3).unwrap();
    let cached = c.board().cell(2, 3).unwrap().distance;

    c.evaluate_square(2, 3).unwrap();
    let cell = c.board().cell(2, 3).unwrap();
    assert!(!cell.revealed);
    assert_eq!(cell.distance, cached);

    c.evaluate_square(2, 3).unwrap();
    assert!(c.board().cell(2, 3).unwrap().revealed);
}

#[test]
fn clear_mode_forgets_on_second_click() {
    let mut c = controller_with(8, RevealMode::Clear);
    c.evaluate_square(4, 1).unwrap();
    assert!(c.board().cell(4, 1).unwrap().shows_distance());

    c.evaluate_square(4, 1).unwrap();
    let cell = c.board().cell(4, 1).unwrap();
    assert_eq!(cell.distance, None);
    assert!(!cell.revealed);
    assert_eq!(c.color_for(cell), None);

    c.evaluate_square(4, 1).unwrap();
    assert!(c.board().cell(4, 1).unwrap().shows_distance());
}

#[test]
fn clear_mode_shows_hidden_cached_square_again() {
    let mut c = controller_with(8, RevealMode::Clear);
    c.apply(BoardAction::RevealAll).unwrap();
    c.apply(BoardAction::RevealAll).unwrap();
    let cached = c.board().cell(3, 3).unwrap().distance;
    assert!(cached.is_some());

    c.evaluate_square(3, 3).unwrap();
    let cell = c.board().cell(3, 3).unwrap();
    assert!(cell.revealed);
    assert_eq!(cell.distance, cached);
}

#[test]
fn reveal_odd_touches_only_odd_squares() {
    let mut c = controller(8);
    c.apply(BoardAction::RevealOdd).unwrap();
    for cell in c.board().cells() {
        let expect = cell.parity == Parity::Odd;
        assert_eq!(cell.revealed, expect, "({}, {})", cell.x, cell.y);
        assert_eq!(cell.distance.is_some(), expect);
    }
    assert_eq!(c.board().revealed_count(), 32);
}

#[test]
fn reveal_even_touches_only_even_squares() {
    let mut c = controller(5);
    c.apply(BoardAction::RevealEven).unwrap();
    assert_eq!(c.board().revealed_count(), 13);
    assert!(c
        .board()
        .cells_with_parity(Parity::Odd)
        .all(|cell| cell.distance.is_none()));
}

#[test]
fn reveal_all_computes_every_square() {
    let mut c = controller(8);
    c.apply(BoardAction::RevealAll).unwrap();
    for cell in c.board().cells() {
        assert_eq!(
            cell.distance,
            Some(distance(cell.x as i64, cell.y as i64).unwrap())
        );
        assert!(cell.revealed);
    }
}

#[test]
fn repeated_reveal_all_keeps_cached_distances() {
    let mut c = controller(8);
    c.apply(BoardAction::RevealAll).unwrap();
    let first = distances(&c);
    c.apply(BoardAction::RevealAll).unwrap();
    assert_eq!(distances(&c), first);
    assert_eq!(c.board().revealed_count(), 0);
}

#[test]
fn bulk_reveal_never_clears_in_clear_mode() {
    let mut c = controller_with(6, RevealMode::Clear);
    c.apply(BoardAction::RevealAll).unwrap();
    let first = distances(&c);
    c.apply(BoardAction::RevealAll).unwrap();
    assert_eq!(distances(&c), first);
    assert!(first.iter().all(Option::is_some));
}

#[test]
fn reset_discards_all_state() {
    let mut c = controller(8);
    c.apply(BoardAction::RevealAll).unwrap();
    c.apply(BoardAction::Reset).unwrap();
    assert_eq!(c.board().size(), 8);
    assert_eq!(c.board().revealed_count(), 0);
    assert!(distances(&c).iter().all(Option::is_none));
}

#[test]
fn resize_clamps_requested_size() {
    let mut c = controller(8);
    c.apply(BoardAction::Resize(2)).unwrap();
    assert_eq!(c.board().size(), 5);
    assert_eq!(c.requested_size(), 5);
    c.apply(BoardAction::Resize(100)).unwrap();
    assert_eq!(c.board().size(), 36);
}

#[test]
fn grow_and_shrink_step_by_one_within_bounds() {
    let mut c = controller(5);
    c.apply(BoardAction::Shrink).unwrap();
    assert_eq!(c.board().size(), 5);
    c.apply(BoardAction::Grow).unwrap();
    c.apply(BoardAction::Grow).unwrap();
    assert_eq!(c.board().size(), 7);
    assert_eq!(c.layout().tiles, 7);
}

#[test]
fn startup_size_is_clamped() {
    assert_eq!(controller(1).board().size(), 5);
    assert_eq!(controller(50).board().size(), 36);
}

#[test]
fn evaluating_outside_the_board_fails() {
    let mut c = controller(5);
    assert!(c.apply(BoardAction::EvaluateSquare { x: 5, y: 0 }).is_err());
}

#[test]
fn quit_shuts_down() {
    let mut c = controller(8);
    assert_eq!(
        c.apply(BoardAction::Quit).unwrap(),
        ControllerStatus::Shutdown
    );
}

#[test]
fn default_keys_map_to_actions() {
    let c = controller(8);
    let none = Modifiers::empty();
    assert_eq!(
        c.action_for_key(KeySymbol::Char('a'), none),
        Some(BoardAction::RevealAll)
    );
    assert_eq!(
        c.action_for_key(KeySymbol::Char('o'), none),
        Some(BoardAction::RevealOdd)
    );
    assert_eq!(
        c.action_for_key(KeySymbol::Char('e'), none),
        Some(BoardAction::RevealEven)
    );
    assert_eq!(
        c.action_for_key(KeySymbol::Char('+'), none),
        Some(BoardAction::Grow)
    );
    assert_eq!(
        c.action_for_key(KeySymbol::Char('c'), Modifiers::CONTROL),
        Some(BoardAction::Quit)
    );
    assert_eq!(c.action_for_key(KeySymbol::Char('z'), none), None);
}

#[test]
fn left_click_on_square_evaluates_it() {
    let mut c = controller(8);
    let rect = c.layout().square_rect(3, 5);
    let mut driver = MockDriver::new(80, 24);
    driver.push_event(BackendEvent::MouseButtonPress {
        button: MouseButton::Left,
        col: rect.x + 1,
        row: rect.y,
        modifiers: Modifiers::empty(),
    });

    let status = c.process_event_cycle(&mut driver).unwrap();
    assert_eq!(status, ControllerStatus::Running);
    assert!(c.board().cell(3, 5).unwrap().shows_distance());
    assert_eq!(driver.commands().last(), Some(&DrawCommand::Present));
}

#[test]
fn clicks_off_the_board_and_right_clicks_are_ignored() {
    let mut c = controller(8);
    let mut driver = MockDriver::new(80, 24);
    driver.push_event(BackendEvent::MouseButtonPress {
        button: MouseButton::Left,
        col: 0,
        row: 0,
        modifiers: Modifiers::empty(),
    });
    let rect = c.layout().square_rect(0, 0);
    driver.push_event(BackendEvent::MouseButtonPress {
        button: MouseButton::Right,
        col: rect.x,
        row: rect.y,
        modifiers: Modifiers::empty(),
    });
    c.process_event_cycle(&mut driver).unwrap();
    assert_eq!(c.board().revealed_count(), 0);
}

#[test]
fn clicks_on_the_status_line_of_a_clipped_board_are_ignored() {
    let mut c = controller(36);
    let status_row = c.layout().status_row();
    let mut driver = MockDriver::new(80, 24);
    driver.push_event(BackendEvent::MouseButtonPress {
        button: MouseButton::Left,
        col: 10,
        row: status_row,
        modifiers: Modifiers::empty(),
    });
    c.process_event_cycle(&mut driver).unwrap();
    assert_eq!(c.board().revealed_count(), 0);
}

#[test]
fn quit_key_stops_the_cycle() {
    let mut c = controller(8);
    let mut driver = MockDriver::new(80, 24);
    driver.push_event(key('a'));
    driver.push_event(key('q'));
    driver.push_event(key('r'));

    assert_eq!(
        c.process_event_cycle(&mut driver).unwrap(),
        ControllerStatus::Shutdown
    );
    // The reset after quit was never applied.
    assert_eq!(c.board().revealed_count(), 64);
}

#[test]
fn close_request_stops_the_cycle() {
    let mut c = controller(8);
    let mut driver = MockDriver::new(80, 24);
    driver.push_event(BackendEvent::CloseRequested);
    assert_eq!(
        c.process_event_cycle(&mut driver).unwrap(),
        ControllerStatus::Shutdown
    );
}

#[test]
fn screen_resize_relayouts_and_redraws() {
    let mut c = controller(8);
    let mut driver = MockDriver::new(80, 24);
    c.process_event_cycle(&mut driver).unwrap();
    assert!(!c.needs_redraw());
    driver.clear_commands();

    driver.set_dimensions(160, 50);
    driver.push_event(BackendEvent::Resize {
        cols: 160,
        rows: 50,
    });
    c.process_event_cycle(&mut driver).unwrap();
    assert_eq!(c.layout().screen_cols, 160);
    assert_eq!(c.layout().square_rows, 5);
    assert_eq!(driver.commands().last(), Some(&DrawCommand::Present));
}

#[test]
fn idle_cycle_does_not_redraw() {
    let mut c = controller(8);
    let mut driver = MockDriver::new(80, 24);
    c.process_event_cycle(&mut driver).unwrap();
    driver.clear_commands();
    c.process_event_cycle(&mut driver).unwrap();
    assert!(driver.commands().is_empty());
}

#[test]
fn status_line_reports_progress() {
    let mut c = controller(5);
    let mut driver = MockDriver::new(80, 24);
    c.apply(BoardAction::RevealOdd).unwrap();
    c.draw(&mut driver).unwrap();
    let line = driver.text_at(0, 23).unwrap();
    assert!(line.contains("5x5"), "{}", line);
    assert!(line.contains("revealed 12/25"), "{}", line);
}
