use crate::application::{App, AppMode, FormField, NotificationLevel, Tab};
use crate::domain::{
    format_area, format_currency, group_thousands, Property, PropertyStatus, Transaction,
    TransactionStatus,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_tabs(f, app, chunks[1]);
    match app.active_tab {
        Tab::Search => render_search_tab(f, app, chunks[2]),
        Tab::Register => render_register_tab(f, app, chunks[2]),
        Tab::Transactions => render_transactions_tab(f, app, chunks[2]),
        Tab::Analytics => render_analytics_tab(f, app, chunks[2]),
    }
    render_status_bar(f, app, chunks[3]);

    if matches!(app.mode, AppMode::Details | AppMode::Transferring) {
        render_details_popup(f, app);
    }
    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
    render_notifications(f, app);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let mut text = format!(
        "Land Registry | Network: Active | Block #{}",
        group_thousands(app.store.block_height())
    );
    let in_flight = app.store.pending_confirmations();
    if in_flight > 0 {
        text.push_str(&format!(" | Confirming: {in_flight}"));
    }
    let header = Paragraph::new(text).style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<String> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{} {}", i + 1, tab.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(app.active_tab.index())
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

fn render_search_box(f: &mut Frame, app: &App, area: Rect, query: &str, title: &str) {
    let editing = app.mode == AppMode::Searching;
    let text = if query.is_empty() && !editing {
        "Press / to search".to_string()
    } else {
        query.to_string()
    };
    let style = if editing {
        Style::default().fg(Color::Green)
    } else if query.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let search = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(search, area);
}

fn property_status_style(status: PropertyStatus) -> Style {
    match status {
        PropertyStatus::Pending => Style::default().fg(Color::Yellow),
        PropertyStatus::Active => Style::default().fg(Color::Green),
        PropertyStatus::Transferred => Style::default().fg(Color::Blue),
    }
}

fn transaction_status_style(status: TransactionStatus) -> Style {
    match status {
        TransactionStatus::Pending => Style::default().fg(Color::Yellow),
        TransactionStatus::Completed => Style::default().fg(Color::Green),
        TransactionStatus::Failed => Style::default().fg(Color::Red),
    }
}

fn selected_style(selected: bool) -> Style {
    if selected {
        Style::default().bg(Color::Blue).fg(Color::White)
    } else {
        Style::default()
    }
}

fn render_search_tab(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_search_box(
        f,
        app,
        chunks[0],
        app.property_query.as_str(),
        "Search by address, owner or property ID",
    );

    let properties = app.visible_properties();
    if properties.is_empty() {
        let message = if app.store.properties().is_empty() {
            "No properties registered yet".to_string()
        } else {
            format!("No properties match '{}'", app.property_query.as_str())
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Properties"));
        f.render_widget(empty, chunks[1]);
        return;
    }

    let header = Row::new(["ID", "Address", "Owner", "Type", "Area", "Value", "Status"])
        .style(Style::default().fg(Color::Yellow));
    let rows = properties.iter().enumerate().map(|(i, property)| {
        property_row(property).style(selected_style(i == app.selected_property))
    });
    let widths = [
        Constraint::Length(10),
        Constraint::Percentage(30),
        Constraint::Percentage(18),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Properties ({})", properties.len())),
        )
        .column_spacing(1);
    f.render_widget(table, chunks[1]);
}

fn property_row(property: &Property) -> Row<'static> {
    Row::new(vec![
        Cell::from(property.id.short()),
        Cell::from(property.address.clone()),
        Cell::from(property.owner.clone()),
        Cell::from(property.property_type.label()),
        Cell::from(format_area(property.area)),
        Cell::from(format_currency(property.value)),
        Cell::from(property.status.label()).style(property_status_style(property.status)),
    ])
}

fn render_register_tab(f: &mut Frame, app: &App, area: Rect) {
    let editing = app.mode == AppMode::Registering;
    let mut lines = Vec::with_capacity(FormField::ALL.len() + 2);

    for field in FormField::ALL {
        let focused = editing && app.form.focused == field;
        let marker = if field.is_required() { "*" } else { " " };
        let mut value = app.form.display_value(field);
        if field == FormField::PropertyType {
            if value.is_empty() {
                value = "(choose with ←/→)".to_string();
            } else if focused {
                value = format!("◀ {value} ▶");
            }
        }
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let value_style = if focused {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<12} ", field.label()), label_style),
            Span::styled(value, value_style),
        ]));
    }

    lines.push(Line::from(""));
    let footer = if app.is_submitting() {
        Span::styled(
            "Submitting registration to the ledger...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )
    } else if editing {
        Span::raw("Enter: submit | Tab/↑↓: move between fields | Esc: leave form")
    } else {
        Span::styled("Press Enter to fill in the form", Style::default().fg(Color::DarkGray))
    };
    lines.push(Line::from(footer));

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Register New Property (* required)"),
    );
    f.render_widget(form, area);
}

fn render_transactions_tab(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_search_box(
        f,
        app,
        chunks[0],
        app.transaction_query.as_str(),
        "Search by transaction ID, property ID or owner",
    );

    let summary = app.ledger_summary();
    render_stat_boxes(
        f,
        chunks[1],
        &[
            ("Completed", summary.completed.to_string(), Color::Green),
            ("Pending", summary.pending.to_string(), Color::Yellow),
            ("Failed", summary.failed.to_string(), Color::Red),
            ("Total Value", format_currency(summary.completed_value), Color::Cyan),
        ],
    );

    let transactions = app.visible_transactions();
    if transactions.is_empty() {
        let message = if app.store.transactions().is_empty() {
            "No transactions recorded yet".to_string()
        } else {
            format!("No transactions match '{}'", app.transaction_query.as_str())
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Ledger"));
        f.render_widget(empty, chunks[2]);
        return;
    }

    let header = Row::new(["Tx ID", "Property", "From", "To", "Value", "Timestamp", "Status"])
        .style(Style::default().fg(Color::Yellow));
    let rows = transactions.iter().enumerate().map(|(i, tx)| {
        transaction_row(tx).style(selected_style(i == app.selected_transaction))
    });
    let widths = [
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Percentage(18),
        Constraint::Percentage(18),
        Constraint::Length(14),
        Constraint::Length(17),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Ledger ({})", transactions.len())),
        )
        .column_spacing(1);
    f.render_widget(table, chunks[2]);
}

fn transaction_row(tx: &Transaction) -> Row<'static> {
    Row::new(vec![
        Cell::from(tx.id.short()),
        Cell::from(tx.property_id.short()),
        Cell::from(tx.from_owner.clone()),
        Cell::from(tx.to_owner.clone()),
        Cell::from(format_currency(tx.value)),
        Cell::from(tx.timestamp.format("%Y-%m-%d %H:%M").to_string()),
        Cell::from(tx.status.label()).style(transaction_status_style(tx.status)),
    ])
}

fn render_analytics_tab(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let analytics = app.analytics();
    render_stat_boxes(
        f,
        chunks[0],
        &[
            ("Total Properties", analytics.total_properties.to_string(), Color::Cyan),
            ("Total Transactions", analytics.total_transactions.to_string(), Color::Cyan),
            ("Total Value", format_currency(analytics.total_value), Color::Green),
        ],
    );
}

fn render_stat_boxes(f: &mut Frame, area: Rect, stats: &[(&str, String, Color)]) {
    let constraints: Vec<Constraint> = stats
        .iter()
        .map(|_| Constraint::Ratio(1, stats.len() as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (chunk, (title, value, color)) in chunks.iter().zip(stats) {
        let stat = Paragraph::new(value.clone())
            .style(Style::default().fg(*color).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).title(title.to_string()));
        f.render_widget(stat, *chunk);
    }
}

fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_details_popup(f: &mut Frame, app: &App) {
    let Some(property) = app.detail_property() else {
        return;
    };
    let area = popup_area(f.area(), 72, 18);
    f.render_widget(Clear, area);

    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<18}"), Style::default().fg(Color::Cyan)),
            Span::raw(value),
        ])
    };
    let mut lines = vec![
        field("Property ID", property.id.to_string()),
        field("Address", property.address.clone()),
        field("Owner", property.owner.clone()),
        field("Type", property.property_type.label().to_string()),
        field("Area", format_area(property.area)),
        field("Value", format_currency(property.value)),
        field("Registered", property.registration_date.format("%Y-%m-%d").to_string()),
        Line::from(vec![
            Span::styled(format!("{:<18}", "Status"), Style::default().fg(Color::Cyan)),
            Span::styled(property.status.label(), property_status_style(property.status)),
        ]),
        field(
            "Coordinates",
            format!("{:.4}, {:.4}", property.coordinates.lat, property.coordinates.lng),
        ),
        field("Document Hash", property.document_hash.clone()),
        Line::from(""),
    ];

    if app.mode == AppMode::Transferring {
        lines.push(Line::from(vec![
            Span::styled("New owner: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                app.transfer_owner.as_str().to_string(),
                Style::default().bg(Color::Blue).fg(Color::White),
            ),
        ]));
    } else {
        lines.push(Line::from(Span::styled(
            "t: transfer ownership | Esc: close",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let details = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Property Details")
                .style(Style::default().fg(Color::White)),
        );
    f.render_widget(details, area);
}

fn render_notifications(f: &mut Frame, app: &App) {
    let screen = f.area();
    if screen.width < TOAST_WIDTH {
        return;
    }
    let x = screen.width - TOAST_WIDTH;
    let mut y = screen.y + 1;

    for toast in app.notifications.iter().rev() {
        if y + TOAST_HEIGHT > screen.height {
            break;
        }
        let area = Rect {
            x,
            y,
            width: TOAST_WIDTH,
            height: TOAST_HEIGHT,
        };
        let color = match toast.level {
            NotificationLevel::Info => Color::Cyan,
            NotificationLevel::Success => Color::Green,
            NotificationLevel::Destructive => Color::Red,
        };
        f.render_widget(Clear, area);
        let widget = Paragraph::new(toast.description.clone())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(toast.title.clone())
                    .style(Style::default().fg(color)),
            );
        f.render_widget(widget, area);
        y += TOAST_HEIGHT;
    }
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                match app.active_tab {
                    Tab::Search => "Tab/1-4: switch tab | j/k: select | /: search | Enter: details | ?: help | q: quit".to_string(),
                    Tab::Register => "Tab/1-4: switch tab | Enter: fill in form | ?: help | q: quit".to_string(),
                    Tab::Transactions => "Tab/1-4: switch tab | j/k: select | /: search | e: export CSV | ?: help | q: quit".to_string(),
                    Tab::Analytics => "Tab/1-4: switch tab | ?: help | q: quit".to_string(),
                }
            }
        }
        AppMode::Searching => format!("Search: {} (Enter to keep, Esc to clear)", search_query(app)),
        AppMode::Registering => format!("Editing {} (Enter to submit, Esc to leave form)", app.form.focused.label()),
        AppMode::Details => "t: transfer ownership | Esc: close".to_string(),
        AppMode::Transferring => format!("New owner: {} (Enter to transfer, Esc to cancel)", app.transfer_owner.as_str()),
        AppMode::ExportCsv => format!("Export ledger as: {} (Enter to export, Esc to cancel)", app.filename_input.as_str()),
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Searching => Style::default().fg(Color::Green),
            AppMode::Registering => Style::default().fg(Color::Yellow),
            AppMode::Details => Style::default().fg(Color::Cyan),
            AppMode::Transferring => Style::default().fg(Color::Yellow),
            AppMode::ExportCsv => Style::default().fg(Color::Magenta),
            AppMode::Help => Style::default().fg(Color::Cyan),
        });
    f.render_widget(input, area);
}

fn search_query(app: &App) -> &str {
    match app.active_tab {
        Tab::Transactions => app.transaction_query.as_str(),
        _ => app.property_query.as_str(),
    }
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("Land Registry Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> &'static str {
    r#"LAND REGISTRY

=== HOW IT WORKS ===
• New registrations appear immediately as "pending"
• After a few seconds the ledger confirms them and they become "active"
• A transfer records a pending transaction straight away
• When the transfer confirms, the owner changes and the transaction completes
• The block number in the header advances with every confirmation

=== TABS ===
1  Search Properties    Find parcels by address, owner or property ID
2  Register Property    Submit a new parcel to the registry
3  Transactions         Browse the ledger and export it as CSV
4  Analytics            Registry totals

=== NAVIGATION ===
Tab / Shift+Tab     Next / previous tab
1-4                 Jump to a tab
j/k or ↑↓           Move the selection
/                   Search the current tab (Search, Transactions)
Enter               Open details (Search) or fill in the form (Register)
?  or F1            Show this help
q                   Quit application

=== SEARCHING ===
Typing filters the list as you go; matching ignores case
Enter               Keep the query
Esc                 Clear the query

=== PROPERTY DETAILS ===
t                   Transfer ownership to a new owner
Enter               Confirm the transfer (owner must not be blank)
Esc                 Cancel the transfer / close the dialog

=== REGISTRATION FORM ===
Tab/↓, Shift+Tab/↑  Move between fields
←/→                 Choose the property type
Enter               Submit (address, owner, type, area and value required)
Esc                 Leave the form; typed values are kept
                    Latitude and longitude default to 0

=== LEDGER EXPORT ===
e                   Export the filtered ledger to a CSV file
                    The file is a report; it is never read back

=== HELP NAVIGATION ===
↑↓ or j/k           Scroll help text up/down one line
Page Up/Down        Scroll help text up/down 5 lines
Home                Jump to top of help text
Esc/F1/?/q          Close this help window"#
}
