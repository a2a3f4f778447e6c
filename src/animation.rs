use std::time::Duration;

use crate::host::{Frame, TrayHost, WindowHost};
use crate::services::tray_icon::{TrayIconImage, TrayIcons};

/// A scheduled revert. Only the ticket of the most recent flash reverts anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashTicket {
    pub generation: u64,
    pub revert_after: Duration,
}

/// Keeps the widget image and the tray icon on the same frame.
pub struct AnimationSync {
    icons: TrayIcons,
    frame: Frame,
    generation: u64,
    flash_for: Duration,
}

impl AnimationSync {
    pub fn new(icons: TrayIcons, flash_for: Duration) -> Self {
        Self {
            icons,
            frame: Frame::Idle,
            generation: 0,
            flash_for,
        }
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Tray icon matching the frame the widget currently shows.
    pub fn tray_icon(&self) -> &TrayIconImage {
        self.icon_for(self.frame)
    }

    pub fn flash<W: WindowHost>(&mut self, window: &W, tray: Option<&dyn TrayHost>) -> FlashTicket {
        self.generation = self.generation.wrapping_add(1);
        self.apply(Frame::Hit, window, tray);
        FlashTicket {
            generation: self.generation,
            revert_after: self.flash_for,
        }
    }

    /// Back to idle, unless a newer flash superseded `generation`.
    pub fn revert<W: WindowHost>(
        &mut self,
        generation: u64,
        window: &W,
        tray: Option<&dyn TrayHost>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        self.apply(Frame::Idle, window, tray);
        true
    }

    fn apply<W: WindowHost>(&mut self, frame: Frame, window: &W, tray: Option<&dyn TrayHost>) {
        self.frame = frame;

        if let Err(err) = window.show_frame(frame) {
            log::warn!("widget frame update failed: {err}");
        }

        if let Some(tray) = tray {
            if let Err(err) = tray.set_icon(self.icon_for(frame)) {
                log::warn!("tray icon animation failed: {err}");
            }
        }
    }

    fn icon_for(&self, frame: Frame) -> &TrayIconImage {
        match frame {
            Frame::Idle => &self.icons.idle,
            Frame::Hit => &self.icons.hit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_icons, SpyTray, SpyWindow};
    use std::sync::atomic::Ordering;

    fn sync() -> AnimationSync {
        AnimationSync::new(test_icons(), Duration::from_millis(150))
    }

    #[test]
    fn test_flash_shows_hit_on_both_surfaces() {
        let mut anim = sync();
        let window = SpyWindow::single_screen();
        let tray = SpyTray::default();

        let ticket = anim.flash(&window, Some(&tray));

        assert_eq!(ticket.revert_after, Duration::from_millis(150));
        assert_eq!(window.last_frame(), Some(Frame::Hit));
        assert_eq!(tray.last_icon(), Some(test_icons().hit));
        assert_eq!(anim.frame(), Frame::Hit);
        assert_eq!(anim.tray_icon(), &test_icons().hit);
    }

    #[test]
    fn test_revert_restores_idle_on_both_surfaces() {
        let mut anim = sync();
        let window = SpyWindow::single_screen();
        let tray = SpyTray::default();

        let ticket = anim.flash(&window, Some(&tray));
        assert!(anim.revert(ticket.generation, &window, Some(&tray)));

        assert_eq!(window.last_frame(), Some(Frame::Idle));
        assert_eq!(tray.last_icon(), Some(test_icons().idle));
        assert_eq!(anim.frame(), Frame::Idle);
    }

    #[test]
    fn test_only_latest_flash_reverts() {
        let mut anim = sync();
        let window = SpyWindow::single_screen();

        let first = anim.flash(&window, None);
        let second = anim.flash(&window, None);

        assert!(!anim.revert(first.generation, &window, None));
        assert_eq!(anim.frame(), Frame::Hit);
        assert!(anim.revert(second.generation, &window, None));
        assert_eq!(anim.frame(), Frame::Idle);
        assert_eq!(
            window.log().frames,
            vec![Frame::Hit, Frame::Hit, Frame::Idle]
        );
    }

    #[test]
    fn test_tray_failure_does_not_stop_widget_flash() {
        let mut anim = sync();
        let window = SpyWindow::single_screen();
        let tray = SpyTray::default();
        tray.fail_icons.store(true, Ordering::SeqCst);

        let ticket = anim.flash(&window, Some(&tray));
        assert_eq!(window.last_frame(), Some(Frame::Hit));

        assert!(anim.revert(ticket.generation, &window, Some(&tray)));
        assert_eq!(window.last_frame(), Some(Frame::Idle));
    }
}
