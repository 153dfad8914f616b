//! The desktop surface: icons, hotkeys and the status bar. Activating an icon
//! mounts the matching window through the [`WindowManager`].

use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::browser::{BrowserOptions, ListingExecutor, RemoteTreeBrowser, ThreadExecutor, TreeSource};
use crate::components::{
    BrowserComponent, Component, LogViewComponent, Profile, ProfileCardComponent,
};
use crate::geometry::Size;
use crate::log_buffer::LogHandle;
use crate::theme;
use crate::ui::{UiFrame, ellipsize};
use crate::window::{MountOutcome, WindowKey, WindowManager, WindowSpec};

const ICON_WIDTH: u16 = 14;
const ICON_SPACING: u16 = 4;
const LIBRARY_SIZE: Size = Size::new(64, 20);

/// Widgets the desktop can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeskApp {
    AudioLibrary,
    ActivityLog,
    Profile,
}

impl DeskApp {
    pub const ALL: [DeskApp; 3] = [DeskApp::AudioLibrary, DeskApp::ActivityLog, DeskApp::Profile];

    pub fn key(self) -> WindowKey {
        WindowKey::new(match self {
            DeskApp::AudioLibrary => "audio-library",
            DeskApp::ActivityLog => "activity-log",
            DeskApp::Profile => "profile",
        })
    }

    pub fn title(self) -> &'static str {
        match self {
            DeskApp::AudioLibrary => "AUDIO LIBRARY",
            DeskApp::ActivityLog => "ACTIVITY LOG",
            DeskApp::Profile => "PROFILE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DeskApp::AudioLibrary => "Audio Library",
            DeskApp::ActivityLog => "Activity Log",
            DeskApp::Profile => "Profile",
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            DeskApp::AudioLibrary => "[ ♫ ]",
            DeskApp::ActivityLog => "[ ≡ ]",
            DeskApp::Profile => "[ @ ]",
        }
    }

    pub fn hotkey(self) -> KeyCode {
        match self {
            DeskApp::AudioLibrary => KeyCode::F(1),
            DeskApp::ActivityLog => KeyCode::F(2),
            DeskApp::Profile => KeyCode::F(3),
        }
    }

    fn from_hotkey(code: KeyCode) -> Option<Self> {
        Self::ALL.into_iter().find(|app| app.hotkey() == code)
    }
}

/// Space left for windows once the status bar row is taken.
pub fn desk_viewport(width: u16, height: u16) -> Size {
    Size::new(width as i32, height.saturating_sub(1) as i32)
}

type ExecutorFactory = Box<dyn Fn() -> Box<dyn ListingExecutor>>;

pub struct HostShell {
    windows: WindowManager,
    profile: Profile,
    source: Arc<dyn TreeSource>,
    browser_options: BrowserOptions,
    make_executor: ExecutorFactory,
    log: Option<LogHandle>,
    icon_targets: Vec<(Rect, DeskApp)>,
    quit: bool,
}

impl std::fmt::Debug for HostShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostShell")
            .field("windows", &self.windows)
            .field("profile", &self.profile)
            .field("quit", &self.quit)
            .finish_non_exhaustive()
    }
}

impl HostShell {
    pub fn new(windows: WindowManager, source: Arc<dyn TreeSource>, profile: Profile) -> Self {
        Self {
            windows,
            profile,
            source,
            browser_options: BrowserOptions::default(),
            make_executor: Box::new(|| Box::new(ThreadExecutor)),
            log: None,
            icon_targets: Vec::new(),
            quit: false,
        }
    }

    pub fn with_browser_options(mut self, options: BrowserOptions) -> Self {
        self.browser_options = options;
        self
    }

    pub fn with_executor(
        mut self,
        factory: impl Fn() -> Box<dyn ListingExecutor> + 'static,
    ) -> Self {
        self.make_executor = Box::new(factory);
        self
    }

    pub fn with_log(mut self, log: LogHandle) -> Self {
        self.log = Some(log);
        self
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    pub fn windows_mut(&mut self) -> &mut WindowManager {
        &mut self.windows
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    fn content_for(&self, app: DeskApp) -> Box<dyn Component> {
        match app {
            DeskApp::AudioLibrary => {
                let browser = RemoteTreeBrowser::new(
                    Arc::clone(&self.source),
                    (self.make_executor)(),
                    self.browser_options.clone(),
                );
                Box::new(BrowserComponent::new(browser))
            }
            DeskApp::ActivityLog => {
                let handle = self.log.clone().unwrap_or_else(|| LogHandle::new(1));
                Box::new(LogViewComponent::new(handle))
            }
            DeskApp::Profile => Box::new(ProfileCardComponent::new(self.profile.clone())),
        }
    }

    /// Opens `app`, or raises it when it is already on the desk.
    pub fn launch(&mut self, app: DeskApp) -> MountOutcome {
        let key = app.key();
        if self.windows.bring_to_front(&key) {
            return MountOutcome::AlreadyOpen;
        }
        let mut spec = WindowSpec::new(key, app.title(), self.content_for(app)).on_close(
            move |key: &WindowKey| {
                tracing::debug!(window = %key, app = app.label(), "desk app dismissed");
            },
        );
        if app == DeskApp::AudioLibrary {
            spec = spec.default_size(LIBRARY_SIZE);
        }
        self.windows.open(spec)
    }

    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
                {
                    tracing::info!("quit requested");
                    self.quit = true;
                    return true;
                }
                if let Some(app) = DeskApp::from_hotkey(key.code) {
                    self.launch(app);
                    return true;
                }
                self.windows.handle_event(event)
            }
            Event::Resize(width, height) => {
                self.windows.set_viewport(desk_viewport(*width, *height));
                true
            }
            Event::Mouse(mouse) => {
                if self.windows.handle_event(event) {
                    return true;
                }
                if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
                    return false;
                }
                let hit = self.icon_targets.iter().find_map(|(rect, app)| {
                    let inside = mouse.column >= rect.x
                        && mouse.column < rect.right()
                        && mouse.row >= rect.y
                        && mouse.row < rect.bottom();
                    inside.then_some(*app)
                });
                match hit {
                    Some(app) => {
                        self.launch(app);
                        true
                    }
                    None => false,
                }
            }
            _ => self.windows.handle_event(event),
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.windows.tick(now);
    }

    pub fn status_text(&self) -> String {
        self.profile.banner()
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        if area.width == 0 || area.height == 0 {
            return;
        }
        frame.fill(
            area,
            " ",
            Style::default().bg(theme::desktop_bg()).fg(theme::desktop_fg()),
        );
        self.render_icons(frame, area);
        self.windows.render(frame);
        self.render_status_bar(frame, area);
    }

    fn render_icons(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        self.icon_targets.clear();
        for (i, app) in DeskApp::ALL.into_iter().enumerate() {
            let x = area.x + 2;
            let y = area.y + 1 + i as u16 * ICON_SPACING;
            if y + 1 >= area.bottom().saturating_sub(1) {
                break;
            }
            let glyph = app.glyph();
            let glyph_x = x + (ICON_WIDTH.saturating_sub(glyph.chars().count() as u16)) / 2;
            frame.set_string(glyph_x, y, glyph, theme::icon());
            let label = ellipsize(app.label(), ICON_WIDTH as usize);
            let label_x = x + (ICON_WIDTH.saturating_sub(label.chars().count() as u16)) / 2;
            frame.set_string(label_x, y + 1, &label, theme::icon_label());
            self.icon_targets.push((Rect::new(x, y, ICON_WIDTH, 2), app));
        }
    }

    fn render_status_bar(&self, frame: &mut UiFrame<'_>, area: Rect) {
        let y = area.bottom() - 1;
        let bar = Rect::new(area.x, y, area.width, 1);
        frame.fill(bar, " ", theme::status_bar());
        let hints = " F1 Library  F2 Log  F3 Profile  Ctrl+W Close  Ctrl+Q Quit";
        let banner = self.status_text();
        let banner_width = banner.chars().count() as u16 + 1;
        let hints_room = area.width.saturating_sub(banner_width + 1) as usize;
        frame.set_string(area.x, y, &ellipsize(hints, hints_room), theme::status_bar());
        if banner_width < area.width {
            frame.set_string(area.right() - banner_width, y, &banner, theme::status_bar());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{InlineExecutor, MemoryObjectStore, ObjectStoreSource};
    use crate::geometry::GeometryStore;
    use crossterm::event::{KeyEvent, MouseEvent};
    use ratatui::buffer::Buffer;

    fn shell() -> HostShell {
        let windows = WindowManager::new(GeometryStore::in_memory(), desk_viewport(120, 40));
        HostShell::new(
            windows,
            Arc::new(ObjectStoreSource::new(MemoryObjectStore::demo())),
            Profile::new("alex", "engineer"),
        )
        .with_executor(|| Box::new(InlineExecutor))
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    fn render(shell: &mut HostShell) -> Buffer {
        let area = Rect::new(0, 0, 120, 40);
        let mut buf = Buffer::empty(area);
        shell.render(&mut UiFrame::from_parts(area, &mut buf));
        buf
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn hotkeys_mount_each_app_once() {
        let mut shell = shell();
        assert!(shell.handle_event(&key(KeyCode::F(1), KeyModifiers::NONE)));
        assert!(shell.handle_event(&key(KeyCode::F(3), KeyModifiers::NONE)));
        assert_eq!(shell.launch(DeskApp::AudioLibrary), MountOutcome::AlreadyOpen);
        assert_eq!(shell.windows().len(), 2);
        assert_eq!(shell.windows().focused_key(), Some(&DeskApp::AudioLibrary.key()));
    }

    #[test]
    fn library_window_opens_at_its_own_default_size() {
        let mut shell = shell();
        shell.launch(DeskApp::AudioLibrary);
        let geometry = shell.windows().geometry(&DeskApp::AudioLibrary.key()).unwrap();
        assert_eq!(geometry.size, LIBRARY_SIZE);
        // Bottom-left, above the status bar.
        assert_eq!(geometry.position.x, 2);
        assert_eq!(geometry.bottom(), 39 - 2);
    }

    #[test]
    fn icon_click_launches_and_status_bar_shows_profile() {
        let mut shell = shell();
        let buf = render(&mut shell);
        assert!(row(&buf, 39).contains("SIGNED IN AS ALEX · ENGINEER"));
        assert!(row(&buf, 6).contains("Activity Log"));
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 6,
            row: 5,
            modifiers: KeyModifiers::NONE,
        });
        assert!(shell.handle_event(&click));
        assert!(shell.windows().is_open(&DeskApp::ActivityLog.key()));
    }

    #[test]
    fn ctrl_q_requests_quit() {
        let mut shell = shell();
        assert!(!shell.quit_requested());
        shell.handle_event(&key(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(shell.quit_requested());
    }

    #[test]
    fn tick_drives_library_listing() {
        let mut shell = shell();
        shell.launch(DeskApp::AudioLibrary);
        shell.tick(Instant::now());
        let buf = render(&mut shell);
        let text: String = (0..40).map(|y| row(&buf, y)).collect::<Vec<_>>().join("\n");
        assert!(text.contains("drums"));
        assert!(text.contains("AUDIO LIBRARY"));
    }
}
