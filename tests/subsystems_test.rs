use slsnode::subsystems::{
    led::{LedCommand, LedStatus},
    radio::DEFAULT_PAN_ID,
    thermal::{ThermalCommand, TEMP_MAX_C, TEMP_MIN_C, TEMP_STEP_C},
    Direction, LedBank, LedSystem, RadioSystem, SimulatedLeds, SimulatedRadio, Subsystem,
    TemperatureLimits, ThermalSystem,
};

#[cfg(test)]
mod thermal_system_tests {
    use super::*;

    /// Enabled simulator sitting at `value`, heading up.
    fn running_at(value: i16) -> ThermalSystem {
        let mut thermal = ThermalSystem::default();
        thermal.set_temperature(i32::from(value)).unwrap();
        thermal.set_simulation(true);
        thermal
    }

    #[test]
    fn test_thermal_system_initialization() {
        let thermal = ThermalSystem::default();
        let state = thermal.get_state();

        assert_eq!(state.value_c, 25);
        assert_eq!(state.direction, Direction::Rising);
        assert!(!state.enabled);
        assert_eq!(thermal.limits(), TemperatureLimits { min_c: 20, max_c: 35, step_c: 1 });
    }

    #[test]
    fn test_initial_value_clamped_into_limits() {
        assert_eq!(ThermalSystem::new(TemperatureLimits::default(), 90).temperature_c(), TEMP_MAX_C);
        assert_eq!(ThermalSystem::new(TemperatureLimits::default(), -5).temperature_c(), TEMP_MIN_C);
    }

    #[test]
    fn test_tick_is_noop_while_disabled() {
        let mut thermal = ThermalSystem::default();
        for _ in 0..50 {
            assert!(!thermal.tick());
        }
        assert_eq!(thermal.temperature_c(), 25);
    }

    #[test]
    fn test_tick_steps_by_one() {
        let mut thermal = running_at(25);
        assert!(thermal.tick());
        assert_eq!(thermal.temperature_c(), 26);
        assert_eq!(thermal.direction(), Direction::Rising);
    }

    #[test]
    fn test_reaching_max_clamps_and_reverses() {
        let mut thermal = running_at(TEMP_MAX_C - 1);
        thermal.tick();
        assert_eq!(thermal.temperature_c(), TEMP_MAX_C);
        assert_eq!(thermal.direction(), Direction::Falling);
        thermal.tick();
        assert_eq!(thermal.temperature_c(), TEMP_MAX_C - TEMP_STEP_C);
    }

    #[test]
    fn test_at_max_rising_reverses_without_overshoot() {
        let mut thermal = running_at(TEMP_MAX_C);
        assert_eq!(thermal.direction(), Direction::Rising);
        thermal.tick();
        assert_eq!(thermal.direction(), Direction::Falling);
        assert_eq!(thermal.temperature_c(), TEMP_MAX_C - TEMP_STEP_C);
    }

    #[test]
    fn test_reaching_min_clamps_and_reverses() {
        let mut thermal = running_at(TEMP_MAX_C);
        // 35 -> 20 takes 15 falling steps
        for _ in 0..15 {
            thermal.tick();
        }
        assert_eq!(thermal.temperature_c(), TEMP_MIN_C);
        assert_eq!(thermal.direction(), Direction::Rising);
        thermal.tick();
        assert_eq!(thermal.temperature_c(), TEMP_MIN_C + TEMP_STEP_C);
    }

    #[test]
    fn test_value_stays_in_bounds_from_every_start() {
        for start in TEMP_MIN_C..=TEMP_MAX_C {
            let mut thermal = running_at(start);
            for step in 0..200 {
                thermal.tick();
                let v = thermal.temperature_c();
                assert!(
                    (TEMP_MIN_C..=TEMP_MAX_C).contains(&v),
                    "start {} step {} produced {}",
                    start, step, v
                );
            }
        }
    }

    #[test]
    fn test_large_step_never_overshoots() {
        let limits = TemperatureLimits { min_c: 20, max_c: 35, step_c: 4 };
        let mut thermal = ThermalSystem::new(limits, 33);
        thermal.set_simulation(true);
        let mut seen = Vec::new();
        for _ in 0..12 {
            thermal.tick();
            seen.push(thermal.temperature_c());
        }
        assert!(seen.iter().all(|v| (20..=35).contains(v)), "{:?}", seen);
        assert_eq!(&seen[..3], &[35, 31, 27]);
    }

    #[test]
    fn test_set_temperature_bounds() {
        let mut thermal = ThermalSystem::default();
        assert_eq!(thermal.set_temperature(20), Ok(20));
        assert_eq!(thermal.set_temperature(35), Ok(35));

        let err = thermal.set_temperature(40).unwrap_err();
        assert_eq!(err.requested, 40);
        assert_eq!((err.min_c, err.max_c), (20, 35));
        assert_eq!(thermal.temperature_c(), 35);

        assert!(thermal.set_temperature(19).is_err());
        assert!(thermal.set_temperature(0).is_err());
        assert_eq!(thermal.temperature_c(), 35);
    }

    #[test]
    fn test_commands_through_subsystem_trait() {
        let mut thermal = ThermalSystem::default();
        assert!(thermal.execute_command(ThermalCommand::SetSimulation(true)).is_ok());
        assert!(thermal.is_simulating());
        assert!(thermal.execute_command(ThermalCommand::SetTemperature(30)).is_ok());
        assert!(thermal.execute_command(ThermalCommand::SetTemperature(99)).is_err());
        assert_eq!(thermal.get_state().value_c, 30);
        assert!(thermal.execute_command(ThermalCommand::SetSimulation(false)).is_ok());
        assert!(!thermal.get_state().enabled);
    }
}

#[cfg(test)]
mod led_system_tests {
    use super::*;

    #[test]
    fn test_led_system_initialization() {
        let leds = LedSystem::new(SimulatedLeds::new());
        let state = leds.get_state();
        assert_eq!(state.id, 0x20);
        assert_eq!(state.power, 120);
        assert_eq!(state.dim_level, 80);
        assert_eq!(state.status, LedStatus::On);
        assert!(!state.red_on);
    }

    #[test]
    fn test_red_on_off_drives_hardware() {
        let mut leds = LedSystem::new(SimulatedLeds::new());
        leds.execute_command(LedCommand::RedOn).unwrap();
        assert!(leds.driver().is_on(LedBank::Red));
        assert_eq!(leds.state().status, LedStatus::On);

        leds.execute_command(LedCommand::RedOff).unwrap();
        assert!(!leds.driver().is_on(LedBank::Red));
        assert_eq!(leds.state().status, LedStatus::Off);
        assert!(!leds.state().red_on);
    }

    #[test]
    fn test_all_on_lights_every_bank() {
        let mut leds = LedSystem::new(SimulatedLeds::new());
        leds.execute_command(LedCommand::AllOn).unwrap();
        for bank in [LedBank::Red, LedBank::Green, LedBank::Blue] {
            assert!(leds.driver().is_on(bank));
        }
        assert!(leds.state().red_on);
    }

    #[test]
    fn test_dim_toggles_blue_and_keeps_red() {
        let mut leds = LedSystem::new(SimulatedLeds::new());
        leds.execute_command(LedCommand::RedOn).unwrap();
        leds.execute_command(LedCommand::Dim(50)).unwrap();
        assert!(leds.driver().is_on(LedBank::Blue));
        assert_eq!(leds.state().status, LedStatus::Dimmed);
        assert_eq!(leds.state().dim_level, 50);
        assert!(leds.state().red_on);

        leds.execute_command(LedCommand::Dim(10)).unwrap();
        assert!(!leds.driver().is_on(LedBank::Blue));
    }

    #[test]
    fn test_activity_indicator_leaves_record_alone() {
        let mut leds = LedSystem::new(SimulatedLeds::new());
        let before = leds.get_state();
        leds.indicate_activity(true);
        assert!(leds.driver().is_on(LedBank::Blue));
        leds.indicate_activity(false);
        assert!(!leds.driver().is_on(LedBank::Blue));
        assert_eq!(leds.get_state(), before);
        assert_eq!(leds.driver().writes(), 2);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(LedStatus::Off.code(), 0x00);
        assert_eq!(LedStatus::On.code(), 0x01);
        assert_eq!(LedStatus::Dimmed.code(), 0x02);
    }
}

#[cfg(test)]
mod radio_system_tests {
    use super::*;
    use slsnode::subsystems::{PacketAttr, RadioDriver, RadioParam};

    struct FixedRadio {
        channel: i32,
        rssi: i32,
        lqi: i32,
        tx: i32,
    }

    impl RadioDriver for FixedRadio {
        fn get(&self, param: RadioParam) -> i32 {
            match param {
                RadioParam::Channel => self.channel,
                RadioParam::TxPower => self.tx,
            }
        }

        fn packet_attr(&self, attr: PacketAttr) -> i32 {
            match attr {
                PacketAttr::Rssi => self.rssi,
                PacketAttr::LinkQuality => self.lqi,
            }
        }
    }

    #[test]
    fn test_snapshot_empty_until_refreshed() {
        let radio = RadioSystem::new(SimulatedRadio::default(), DEFAULT_PAN_ID);
        assert_eq!(radio.snapshot().channel, 0);
        assert_eq!(radio.snapshot().pan_id, 0xABCD);
    }

    #[test]
    fn test_refresh_samples_driver() {
        let mut radio = RadioSystem::new(FixedRadio { channel: 15, rssi: -70, lqi: 200, tx: -3 }, 0x1234);
        let snap = *radio.refresh();
        assert_eq!(snap.channel, 15);
        assert_eq!(snap.rssi_dbm, -70);
        assert_eq!(snap.link_quality, 200);
        assert_eq!(snap.tx_power_dbm, -3);
        assert_eq!(snap.pan_id, 0x1234);
    }

    #[test]
    fn test_out_of_range_readings_saturate() {
        let mut radio = RadioSystem::new(FixedRadio { channel: 999, rssi: -500, lqi: -1, tx: 300 }, 1);
        let snap = *radio.refresh();
        assert_eq!(snap.channel, u8::MAX);
        assert_eq!(snap.rssi_dbm, i8::MIN);
        assert_eq!(snap.link_quality, 0);
        assert_eq!(snap.tx_power_dbm, i8::MAX);
    }

    #[test]
    fn test_simulated_radio_link_varies_per_frame() {
        let mut radio = RadioSystem::new(SimulatedRadio::default(), DEFAULT_PAN_ID);
        let first = *radio.refresh();
        let second = *radio.refresh();
        assert_eq!(first.channel, 26);
        assert_eq!(first.tx_power_dbm, 0);
        assert_ne!(first.rssi_dbm, second.rssi_dbm);
        assert!(first.rssi_dbm <= -45 && first.rssi_dbm >= -51);
    }
}
