//! Brazilian Portuguese display labels for the calendar header and grid.

use super::engine::{CalendarView, DayCell, GRID_COLUMNS};
use super::join::AppointmentDetails;
use chrono::{Datelike, NaiveDate};

const MONTH_NAMES: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

const WEEKDAY_NAMES: [&str; 7] = [
    "domingo",
    "segunda-feira",
    "terça-feira",
    "quarta-feira",
    "quinta-feira",
    "sexta-feira",
    "sábado",
];

/// Month grid column headers, Sunday first.
pub const WEEKDAY_HEADERS: [&str; GRID_COLUMNS] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

pub const EMPTY_DAY_TITLE: &str = "Nenhuma consulta agendada";
pub const EMPTY_DAY_MESSAGE: &str = "Não há consultas para este dia.";

pub fn view_label(view: CalendarView) -> &'static str {
    match view {
        CalendarView::Day => "Dia",
        CalendarView::Week => "Semana",
        CalendarView::Month => "Mês",
    }
}

pub fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    WEEKDAY_NAMES[date.weekday().num_days_from_sunday() as usize]
}

/// Header title: `março 2024` for months, `domingo, 10 março 2024` otherwise.
pub fn header_title(date: NaiveDate, view: CalendarView) -> String {
    match view {
        CalendarView::Month => format!("{} {}", month_name(date), date.year()),
        CalendarView::Day | CalendarView::Week => format!(
            "{}, {} {} {}",
            weekday_name(date),
            date.day(),
            month_name(date),
            date.year()
        ),
    }
}

/// One grid entry: `09:00 - Ana Souza`, with a placeholder for unknown
/// patients.
pub fn appointment_line(details: &AppointmentDetails<'_>) -> String {
    format!(
        "{} - {}",
        details.appointment.start_time,
        details.patient.display_name()
    )
}

/// Lays month cells out as text rows: the weekday header, then one row per
/// week with the first day under its weekday column and `*` after today.
pub fn month_grid_rows(cells: &[DayCell]) -> Vec<String> {
    let mut rows = vec![WEEKDAY_HEADERS
        .iter()
        .map(|header| format!("{header:<4}"))
        .collect::<String>()
        .trim_end()
        .to_string()];

    let lead = cells
        .first()
        .map_or(0, |cell| cell.date.weekday().num_days_from_sunday() as usize);
    let mut slots: Vec<String> = vec!["    ".to_string(); lead];
    slots.extend(cells.iter().map(|cell| {
        let marker = if cell.is_today { '*' } else { ' ' };
        format!("{:>2}{marker} ", cell.date.day())
    }));

    rows.extend(
        slots
            .chunks(GRID_COLUMNS)
            .map(|week| week.concat().trim_end().to_string()),
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_follow_view() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(header_title(date, CalendarView::Month), "março 2024");
        assert_eq!(
            header_title(date, CalendarView::Day),
            "domingo, 10 março 2024"
        );
        assert_eq!(
            header_title(date, CalendarView::Week),
            header_title(date, CalendarView::Day)
        );
    }

    #[test]
    fn view_labels_are_localized() {
        assert_eq!(view_label(CalendarView::Day), "Dia");
        assert_eq!(view_label(CalendarView::Week), "Semana");
        assert_eq!(view_label(CalendarView::Month), "Mês");
        assert_eq!(WEEKDAY_HEADERS[0], "Dom");
        assert_eq!(WEEKDAY_HEADERS[6], "Sáb");
    }
}
